// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag here is optional on top of the settings file: a flag that is
// given overrides the file, a flag that is left out keeps the file's value
// (or the built-in default).
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wordcrawl",
    version,
    about = "Crawl websites into a word index and search it",
    long_about = "wordcrawl crawls pages from a seed URL with a pool of parallel workers, \
                  indexes how often each word appears on each page, and answers \
                  multi-word searches ranked by those counts."
)]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Index database file (overrides database.path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a seed URL and index every page reached
    ///
    /// Example: wordcrawl crawl https://example.com --max-depth 2 --workers 8
    Crawl {
        /// URL to start from (overrides crawl.seed_url)
        seed_url: Option<String>,

        /// Maximum crawl depth
        ///
        /// Depth 1 = just the seed page
        /// Depth 2 = seed page + all pages it links to
        #[arg(long)]
        max_depth: Option<usize>,

        /// Number of parallel workers
        #[arg(long)]
        workers: Option<usize>,

        /// Print the crawl report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild word counts for every stored page from its stored content
    Index,

    /// Run a search from the command line
    ///
    /// Example: wordcrawl search "rust web crawler"
    Search {
        /// Up to four words; pages must contain all of them
        query: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the search page over HTTP
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_crawl() {
        let cli = Cli::parse_from([
            "wordcrawl",
            "crawl",
            "https://example.com",
            "--max-depth",
            "3",
            "--workers",
            "2",
        ]);
        match cli.command {
            Commands::Crawl {
                seed_url,
                max_depth,
                workers,
                json,
            } => {
                assert_eq!(seed_url.as_deref(), Some("https://example.com"));
                assert_eq!(max_depth, Some(3));
                assert_eq!(workers, Some(2));
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["wordcrawl", "serve", "--port", "9000", "--db", "x.db"]);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000) }));
    }
}
