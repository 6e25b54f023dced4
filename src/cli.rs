//! Command-line interface definitions for the archiver.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The database URL can be provided via flag or the `DATABASE_URL`
//! environment variable (a `.env` file is honored at startup).

use clap::Parser;

/// Command-line arguments for one archiving run.
///
/// # Examples
///
/// ```sh
/// # Basic usage
/// news_archiver -o ./archive -s ./sources.yaml
///
/// # Database URL from the environment
/// DATABASE_URL=postgres://localhost/news news_archiver -o ./archive -s ./sources.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory the dated output partitions are written under
    #[arg(short, long)]
    pub output_root: String,

    /// Path to the YAML file listing the news sources
    #[arg(short, long, default_value = "sources.yaml")]
    pub sources: String,

    /// PostgreSQL connection URL for the article store
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "news_archiver",
            "--output-root",
            "./archive",
            "--sources",
            "./sources.yaml",
            "--database-url",
            "postgres://localhost/news",
        ]);

        assert_eq!(cli.output_root, "./archive");
        assert_eq!(cli.sources, "./sources.yaml");
        assert_eq!(cli.database_url, "postgres://localhost/news");
    }

    #[test]
    fn test_cli_short_flags_and_sources_default() {
        let cli = Cli::parse_from(&[
            "news_archiver",
            "-o",
            "/tmp/archive",
            "--database-url",
            "postgres://localhost/news",
        ]);

        assert_eq!(cli.output_root, "/tmp/archive");
        assert_eq!(cli.sources, "sources.yaml");
    }
}
