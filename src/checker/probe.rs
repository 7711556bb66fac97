// src/checker/probe.rs
// =============================================================================
// This module decides whether a link is reachable by making an HTTP request.
//
// The rule is simple:
// - the request fails outright (DNS, TLS, refused, timeout...) -> broken
// - the response status is 400 or above                         -> broken
// - anything else (2xx, or 3xx left after following redirects)  -> fine
//
// One request, no retries. The LinkProbe trait is the seam between the
// aggregator and the network, so tests can swap in a scripted probe.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

// Why a probe could not get any status code at all
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

// Anything that can fetch a URL and report its HTTP status
#[async_trait]
pub trait LinkProbe: Send + Sync {
    /// Issues one request and returns the final status code
    async fn probe(&self, url: &str) -> Result<u16, ProbeError>;

    /// True when the link should be reported as broken
    async fn is_broken(&self, url: &str) -> bool {
        match self.probe(url).await {
            Ok(status) => status >= 400,
            Err(e) => {
                debug!(url, error = %e, "link unreachable");
                true
            }
        }
    }
}

// The real probe: a GET request through a shared reqwest client
//
// The client carries the timeout and redirect policy (see config.rs).
// Client is cheap to clone (it's just a reference counter internally).
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<u16, ProbeError> {
        match self.client.get(url).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) => Err(categorize_error(e)),
        }
    }
}

// Sorts reqwest failures into a few buckets for the logs
fn categorize_error(error: reqwest::Error) -> ProbeError {
    if error.is_timeout() {
        ProbeError::Timeout
    } else if error.is_redirect() {
        ProbeError::TooManyRedirects
    } else if error.is_connect() {
        ProbeError::Connect(error.to_string())
    } else {
        ProbeError::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Serves the same canned response to every connection on 127.0.0.1
    async fn serve(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        status_line
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}/", addr)
    }

    // Like serve, but the response head depends on the request line
    async fn serve_with(respond: fn(&str) -> String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        respond(request.lines().next().unwrap_or(""))
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}/start", addr)
    }

    fn probe() -> HttpProbe {
        HttpProbe::new(AuditConfig::default().http_client().unwrap())
    }

    #[tokio::test]
    async fn test_status_200_is_not_broken() {
        let url = serve("200 OK").await;
        assert_eq!(probe().probe(&url).await.unwrap(), 200);
        assert!(!probe().is_broken(&url).await);
    }

    #[tokio::test]
    async fn test_status_404_is_broken() {
        let url = serve("404 Not Found").await;
        assert_eq!(probe().probe(&url).await.unwrap(), 404);
        assert!(probe().is_broken(&url).await);
    }

    #[tokio::test]
    async fn test_status_500_is_broken() {
        let url = serve("500 Internal Server Error").await;
        assert!(probe().is_broken(&url).await);
    }

    #[tokio::test]
    async fn test_refused_connection_is_broken() {
        // Grab a free port, then close it so nothing is listening there
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/", addr);
        assert!(probe().probe(&url).await.is_err());
        assert!(probe().is_broken(&url).await);
    }

    #[tokio::test]
    async fn test_empty_url_is_broken() {
        assert!(probe().is_broken("").await);
    }

    #[tokio::test]
    async fn test_redirect_to_success_is_not_broken() {
        let url = serve_with(|request_line| {
            if request_line.starts_with("GET /start ") {
                "302 Found\r\nLocation: /ok".to_string()
            } else {
                "200 OK".to_string()
            }
        })
        .await;

        assert_eq!(probe().probe(&url).await.unwrap(), 200);
        assert!(!probe().is_broken(&url).await);
    }

    #[tokio::test]
    async fn test_redirect_loop_past_limit_is_broken() {
        let url = serve_with(|_| "302 Found\r\nLocation: /loop".to_string()).await;

        let config = AuditConfig {
            max_redirects: 1,
            ..AuditConfig::default()
        };
        let probe = HttpProbe::new(config.http_client().unwrap());

        assert!(matches!(probe.probe(&url).await, Err(ProbeError::TooManyRedirects)));
        assert!(probe.is_broken(&url).await);
    }
}
