// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// There are no subcommands: linksweep does exactly one thing, so all the
// options live on a single flat struct. Policy choices (internal/external
// link handling, newline style) are enums deriving ValueEnum so clap can
// validate and list the accepted values for us.
// =============================================================================

use clap::Parser;

use crate::crawl::{ExternalPolicy, InternalPolicy};
use crate::output::NewlineMode;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "linksweep",
    version,
    about = "A concurrent dead link checker for websites",
    long_about = "linksweep crawls a website starting from a seed URL and reports the \
                  status code of every link it finds, flagging dead links (HTTP >= 400). \
                  It's perfect for CI/CD pipelines to catch broken links before users do.",
    after_help = "example: linksweep http://beluki.github.io --external ignore --threads 3"
)]
pub struct Cli {
    /// URL to crawl looking for links
    ///
    /// This is a positional argument (required, no flag needed)
    pub url: String,

    /// Number of worker threads (default: 1, must be at least 1)
    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    /// Seconds to wait for request responses (default: 10, 0 = no timeout)
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// What to do with links on the seed's own host
    ///
    /// check  = verify the status code only
    /// follow = also extract links from the page and keep crawling
    #[arg(long, value_enum, default_value_t = InternalPolicy::Check)]
    pub internal: InternalPolicy,

    /// What to do with links on other hosts
    ///
    /// check  = verify the status code only
    /// ignore = drop without checking
    /// follow = also extract links from the page and keep crawling
    #[arg(long, value_enum, default_value_t = ExternalPolicy::Check)]
    pub external: ExternalPolicy,

    /// Follow HTTP redirects instead of reporting the 3xx status
    #[arg(long)]
    pub follow_redirects: bool,

    /// Print all status codes and urls instead of only failures (>= 400)
    #[arg(long)]
    pub print_all: bool,

    /// Use a specific newline mode for status lines (default: system)
    #[arg(long, value_enum, default_value_t = NewlineMode::System)]
    pub newline: NewlineMode,

    /// Suppress the end-of-run statistics line
    #[arg(long)]
    pub quiet: bool,

    /// Output check results as a JSON array instead of status lines
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["linksweep", "http://example.com"]).unwrap();
        assert_eq!(cli.url, "http://example.com");
        assert_eq!(cli.threads, 1);
        assert_eq!(cli.timeout, 10);
        assert!(matches!(cli.internal, InternalPolicy::Check));
        assert!(matches!(cli.external, ExternalPolicy::Check));
        assert!(!cli.follow_redirects);
        assert!(!cli.print_all);
        assert!(!cli.quiet);
        assert!(!cli.json);
    }

    #[test]
    fn test_policy_values() {
        let cli = Cli::try_parse_from([
            "linksweep",
            "http://example.com",
            "--internal",
            "follow",
            "--external",
            "ignore",
            "--threads",
            "4",
        ])
        .unwrap();
        assert!(matches!(cli.internal, InternalPolicy::Follow));
        assert!(matches!(cli.external, ExternalPolicy::Ignore));
        assert_eq!(cli.threads, 4);
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["linksweep"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result =
            Cli::try_parse_from(["linksweep", "http://example.com", "--external", "skip"]);
        assert!(result.is_err());
    }
}
