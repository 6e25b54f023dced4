//! RSS-feed-backed article fetcher.
//!
//! Listing parses the source's feed with the `rss` crate and collects each
//! item's link in feed order. Extraction downloads the article page and
//! pulls the headline from `<h1>` (falling back to `<title>`) and the body
//! from the page's `<p>` elements. The extraction is deliberately generic;
//! it works well on text-oriented news pages and degrades to an
//! [`FetchError::EmptyContent`] on pages with no readable paragraphs.

use crate::error::FetchError;
use crate::models::{Article, Source};
use crate::sources::ArticleFetcher;
use async_trait::async_trait;
use rss::Channel;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

/// Production [`ArticleFetcher`] over HTTP.
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleFetcher for FeedFetcher {
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    async fn list_articles(&self, source: &Source) -> Result<Vec<String>, FetchError> {
        let response = self.client.get(&source.feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: source.feed_url.clone(),
                status,
            });
        }

        let body = response.bytes().await?;
        let channel = Channel::read_from(&body[..])?;

        let urls: Vec<String> = channel
            .items()
            .iter()
            .filter_map(|item| item.link())
            .map(str::to_string)
            .collect();

        info!(count = urls.len(), feed = %source.feed_url, "Listed article URLs");
        debug!(?urls, "Feed URLs");
        Ok(urls)
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name, %url))]
    async fn extract_article(&self, source: &Source, url: &str) -> Result<Article, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        let (title, content) = extract_text(&body);
        if content.is_empty() {
            return Err(FetchError::EmptyContent {
                url: url.to_string(),
            });
        }

        info!(bytes = content.len(), "Extracted article");
        Ok(Article {
            url: url.to_string(),
            title,
            content,
            source: source.name.clone(),
        })
    }
}

/// Pull (headline, body text) out of an article page.
fn extract_text(html: &str) -> (String, String) {
    let document = Html::parse_document(html);

    let h1_selector = Selector::parse("h1").unwrap();
    let title_selector = Selector::parse("title").unwrap();
    let paragraph_selector = Selector::parse("p").unwrap();

    let title = document
        .select(&h1_selector)
        .next()
        .or_else(|| document.select(&title_selector).next())
        .map(|element| element.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .unwrap_or_default();

    let mut content = String::new();
    for element in document.select(&paragraph_selector) {
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.trim();
        if !text.is_empty() {
            content.push_str(text);
            content.push('\n');
        }
    }

    (title, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED_XML: &str = r#"
        <rss version="2.0">
            <channel>
                <title>Test Feed</title>
                <link>http://example.com</link>
                <description>Test</description>
                <item>
                    <title>Article One</title>
                    <link>http://example.com/article1</link>
                </item>
                <item>
                    <title>Article Two</title>
                    <link>http://example.com/article2</link>
                </item>
            </channel>
        </rss>"#;

    fn source(feed_url: String) -> Source {
        Source {
            name: "test".to_string(),
            feed_url,
        }
    }

    #[tokio::test]
    async fn test_list_articles_preserves_feed_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED_XML))
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new();
        let urls = fetcher
            .list_articles(&source(format!("{}/rss", server.uri())))
            .await
            .unwrap();

        assert_eq!(
            urls,
            vec![
                "http://example.com/article1".to_string(),
                "http://example.com/article2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_articles_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = FeedFetcher::new();
        let err = fetcher
            .list_articles(&source(format!("{}/rss", server.uri())))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { .. }));
    }

    #[tokio::test]
    async fn test_extract_article_pulls_headline_and_paragraphs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><head><title>Page Title</title></head>\
                 <body><h1>Big Story</h1><p>First paragraph.</p>\
                 <p>Second paragraph.</p></body></html>",
            ))
            .mount(&server)
            .await;

        let src = source(format!("{}/rss", server.uri()));
        let fetcher = FeedFetcher::new();
        let article = fetcher
            .extract_article(&src, &format!("{}/article1", server.uri()))
            .await
            .unwrap();

        assert_eq!(article.title, "Big Story");
        assert_eq!(article.content, "First paragraph.\nSecond paragraph.\n");
        assert_eq!(article.source, "test");
    }

    #[tokio::test]
    async fn test_extract_article_empty_page_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&server)
            .await;

        let src = source(format!("{}/rss", server.uri()));
        let fetcher = FeedFetcher::new();
        let err = fetcher
            .extract_article(&src, &format!("{}/empty", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::EmptyContent { .. }));
    }

    #[test]
    fn test_extract_text_falls_back_to_title_tag() {
        let (title, content) =
            extract_text("<html><head><title>Only Title</title></head><body><p>Text.</p></body></html>");
        assert_eq!(title, "Only Title");
        assert_eq!(content, "Text.\n");
    }
}
