// src/error.rs
// =============================================================================
// Error types for the page audit pipeline.
//
// Only failures that abort a whole audit live here. A link that cannot be
// reached is NOT an error - it is recorded as broken on that link's record
// (see checker/probe.rs).
// =============================================================================

use thiserror::Error;

// Everything that can stop an audit before a report is produced
#[derive(Debug, Error)]
pub enum AuditError {
    /// The address given by the user is not an absolute http(s) URL
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Downloading the page itself failed
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The downloaded body could not be read as an HTML document
    #[error("Failed to parse document: {reason}")]
    Parse { reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// Shorthand used across the crate
pub type Result<T> = std::result::Result<T, AuditError>;
