// src/fetch.rs
// =============================================================================
// Downloads the page to be audited.
//
// This is the only "real" page fetch - after this the checker only makes
// per-link probe requests. We keep the URL the client ended up at after
// redirects, because relative links on the page resolve against THAT URL,
// not the one the user typed.
// =============================================================================

use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::error::{AuditError, Result};

// A downloaded page, ready for analysis
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,
    /// Body decoded with the charset from Content-Type (UTF-8 if none)
    pub body: String,
}

// Checks that the user gave us an absolute http(s) URL
pub fn parse_address(address: &str) -> Result<Url> {
    let url = Url::parse(address.trim()).map_err(|e| AuditError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AuditError::InvalidAddress {
            address: address.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

// Fetches a web page and returns its decoded text
//
// A non-2xx status is only a warning: whatever the server sent back is
// still analyzed. reqwest's text() picks the charset from Content-Type and
// replaces undecodable bytes, so Latin-1 or windows-1252 pages still get a
// report. Only a body that cannot be read at all is a parse error.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    let fetch_error = |source| AuditError::Fetch {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(fetch_error)?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        warn!(url = %final_url, status = status.as_u16(), "page returned a non-success status");
    }

    let body = response.text().await.map_err(|e| AuditError::Parse {
        reason: format!("could not read body of {}: {}", final_url, e),
    })?;

    info!(url = %final_url, status = status.as_u16(), bytes = body.len(), "page fetched");

    Ok(FetchedPage {
        url: final_url,
        body,
    })
}
