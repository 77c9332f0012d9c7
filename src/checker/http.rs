// src/checker/http.rs
// =============================================================================
// This module is the HTTP client capability of the crawler.
//
// Key functionality:
// - Makes HTTP HEAD requests for check-only tasks (lightweight, no body)
// - Makes GET requests when the caller wants the body for link extraction,
//   and only reads the body when the response is actually HTML and not an
//   error status
// - Classifies failures into a typed taxonomy: a timeout is distinct from
//   every other network failure, because the driver reports them differently
//
// One reqwest Client is built per run and shared by every worker, so we get
// connection pooling for free. The per-request timeout and the redirect
// policy are fixed at client build time - they are run-level configuration,
// not per-task knobs.
// =============================================================================

use std::time::Duration;

use reqwest::{redirect, Client};
use serde::Serialize;
use thiserror::Error;

// How a request can fail. The driver inspects this synchronously when a
// completed task comes back - no exception-style opaque context.
//
// Serialize is derived so failed tasks can appear in --json output.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckError {
    /// The request did not complete within the configured timeout
    #[error("timeout")]
    Timeout,
    /// Any other network failure: connection refused, DNS, TLS, etc.
    #[error("{message}")]
    Network { message: String },
}

// What a successful request produced.
//
// `body` is only Some when the caller asked for it AND the response was an
// HTML page with a non-error status - the three conditions under which the
// crawler will ever parse a body.
#[derive(Debug)]
pub struct CheckedResponse {
    /// HTTP status code (200, 404, ...)
    pub status: u16,
    /// Value of the Content-Type header, if present
    pub content_type: Option<String>,
    /// Page body, only fetched when it is worth parsing
    pub body: Option<String>,
}

/// HTTP checker shared by all workers for the duration of a run.
pub struct HttpChecker {
    client: Client,
}

impl HttpChecker {
    // Builds the checker.
    //
    // Parameters:
    //   timeout: per-request timeout; None means wait forever (--timeout 0)
    //   follow_redirects: follow 3xx responses (up to 10 hops) instead of
    //                     reporting the 3xx status itself
    pub fn new(timeout: Option<Duration>, follow_redirects: bool) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .redirect(if follow_redirects {
                redirect::Policy::limited(10)
            } else {
                redirect::Policy::none()
            })
            .user_agent(concat!("linksweep/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    // Checks one URL.
    //
    // fetch_body = false: a HEAD request, status and headers only.
    // fetch_body = true:  a GET request; the body is read only when the
    //                     status is < 400 and the content type is HTML, so
    //                     a dead or binary link never downloads its payload.
    pub async fn check(&self, url: &str, fetch_body: bool) -> Result<CheckedResponse, CheckError> {
        let request = if fetch_body {
            self.client.get(url)
        } else {
            self.client.head(url)
        };

        let response = request.send().await.map_err(categorize_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = if fetch_body && status < 400 && is_html(content_type.as_deref()) {
            // Reading the body can also time out
            Some(response.text().await.map_err(categorize_error)?)
        } else {
            None
        };

        Ok(CheckedResponse {
            status,
            content_type,
            body,
        })
    }
}

// True for the content types the link extractor can parse
fn is_html(content_type: Option<&str>) -> bool {
    match content_type {
        Some(value) => {
            let value = value.to_ascii_lowercase();
            value.starts_with("text/html") || value.starts_with("application/xhtml+xml")
        }
        None => false,
    }
}

// Converts a reqwest error into our taxonomy.
//
// reqwest's Display is terse ("error sending request for url ..."), so for
// the Network variant we walk the source chain and keep the innermost
// message - that's where "Connection refused" or the DNS failure lives.
fn categorize_error(error: reqwest::Error) -> CheckError {
    if error.is_timeout() {
        return CheckError::Timeout;
    }

    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        message = cause.to_string();
        source = std::error::Error::source(cause);
    }

    CheckError::Network { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_is_html() {
        assert!(is_html(Some("text/html")));
        assert!(is_html(Some("text/html; charset=utf-8")));
        assert!(is_html(Some("application/xhtml+xml")));
        assert!(is_html(Some("TEXT/HTML")));
        assert!(!is_html(Some("application/json")));
        assert!(!is_html(Some("image/png")));
        assert!(!is_html(None));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind a listener to grab a free port, then drop it so nothing is
        // listening there anymore
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let checker = HttpChecker::new(Some(Duration::from_secs(5)), false).unwrap();
        let result = checker
            .check(&format!("http://127.0.0.1:{}/", port), false)
            .await;

        assert!(matches!(result, Err(CheckError::Network { .. })));
    }

    #[tokio::test]
    async fn test_unresponsive_server_is_timeout() {
        // Accept connections but never answer them
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            loop {
                let _socket = listener.accept().await;
                // hold the socket open without responding
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        });

        let checker = HttpChecker::new(Some(Duration::from_millis(300)), false).unwrap();
        let result = checker
            .check(&format!("http://127.0.0.1:{}/", port), false)
            .await;

        assert!(matches!(result, Err(CheckError::Timeout)));
    }

    #[tokio::test]
    async fn test_head_request_reads_status_and_content_type() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // consume the request headers before answering
            let mut buffer = vec![0u8; 4096];
            let mut read = 0;
            loop {
                let n = tokio::io::AsyncReadExt::read(&mut socket, &mut buffer[read..])
                    .await
                    .unwrap_or(0);
                if n == 0 {
                    break;
                }
                read += n;
                if buffer[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = "HTTP/1.1 404 Not Found\r\n\
                            Content-Type: text/html\r\n\
                            Content-Length: 0\r\n\
                            Connection: close\r\n\r\n";
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        let checker = HttpChecker::new(Some(Duration::from_secs(5)), false).unwrap();
        let response = checker
            .check(&format!("http://127.0.0.1:{}/missing", port), false)
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.content_type.as_deref(), Some("text/html"));
        assert!(response.body.is_none());
    }
}
