// src/config.rs
// =============================================================================
// Runtime options for one audit.
//
// There is no config file: every value comes from a CLI flag (see cli.rs) and
// falls back to the defaults below. The same config drives the page fetch and
// every link probe, so both share one timeout and one User-Agent.
// =============================================================================

use std::time::Duration;

// How long a single request may take before it counts as failed
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Same limit as reqwest's default redirect policy
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Per-request timeout for the page fetch and each link probe
    pub timeout: Duration,
    /// Upper bound on in-flight link probes; None = one task per link, no limit
    pub max_concurrency: Option<usize>,
    /// Redirects a probe follows before giving up
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrency: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("page-auditor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AuditConfig {
    // Builds a reqwest client that honours this config
    //
    // One client is shared by the page fetch and all probes (connection pooling)
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
            .user_agent(self.user_agent.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrency, None);
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("page-auditor/"));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(AuditConfig::default().http_client().is_ok());
    }
}
