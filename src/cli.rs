// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::Parser;

use crate::config::{AuditConfig, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "page-auditor",
    version,
    about = "Analyze a web page's structure and check every link on it",
    long_about = "page-auditor fetches one page, reports its title, HTML version, heading counts \
                  and whether it has a login form, then checks every link on the page and \
                  classifies it as internal/external and working/broken. Links are checked, \
                  never crawled."
)]
pub struct Cli {
    /// Page to audit (e.g., https://example.com)
    pub address: String,

    /// Output the report in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Seconds before a request (page fetch or link check) is abandoned
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Maximum number of links checked at the same time (default: no limit)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_concurrency: Option<u64>,

    /// Maximum redirects followed per request
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Show debug logs (one line per checked link)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // Turns the parsed flags into the runtime config
    pub fn config(&self) -> AuditConfig {
        AuditConfig {
            timeout: std::time::Duration::from_secs(self.timeout),
            max_concurrency: self.max_concurrency.map(|n| n as usize),
            max_redirects: self.max_redirects,
            ..AuditConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["page-auditor", "https://example.com"]).unwrap();
        assert_eq!(cli.address, "https://example.com");
        assert!(!cli.json);

        let config = cli.config();
        assert_eq!(config.timeout.as_secs(), 10);
        assert_eq!(config.max_concurrency, None);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "page-auditor",
            "https://example.com",
            "--json",
            "--timeout",
            "3",
            "--max-concurrency",
            "8",
            "--max-redirects",
            "2",
            "-v",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.verbose);

        let config = cli.config();
        assert_eq!(config.timeout.as_secs(), 3);
        assert_eq!(config.max_concurrency, Some(8));
        assert_eq!(config.max_redirects, 2);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = Cli::try_parse_from(["page-auditor", "https://example.com", "--max-concurrency", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Cli::try_parse_from(["page-auditor", "https://example.com", "--timeout", "0"]);
        assert!(result.is_err());
    }
}
