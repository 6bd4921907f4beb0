//! Shared HTTP request handling for the adapters
//!
//! Sending, logging and body reading live here; each adapter builds its own
//! `RequestBuilder` and decides how to interpret the body.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::TransportError;

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Status and body of a completed request.
#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<u64>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Send a request and read the whole body.
    ///
    /// Only transport failures are errors here; any HTTP status is returned.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        service: &str,
        url: &str,
    ) -> Result<HttpResponse, TransportError> {
        log::debug!("[{service}] GET {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            } else {
                TransportError::Network {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[{service}] Response Status: {status}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    service: service.to_string(),
                    detail: e.to_string(),
                }
            } else {
                TransportError::Network {
                    service: service.to_string(),
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!("[{service}] Response Body: {}", truncate_for_log(&body));

        Ok(HttpResponse {
            status,
            body,
            retry_after,
        })
    }

    /// Parse a JSON body, falling back to a status error when the body is not
    /// JSON and the status was not a success.
    pub fn parse_json<T>(response: &HttpResponse, service: &str) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(value),
            Err(_) if response.status == 429 => {
                log::warn!(
                    "[{service}] Rate limited (HTTP 429), retry_after={:?}",
                    response.retry_after
                );
                Err(TransportError::RateLimited {
                    service: service.to_string(),
                    retry_after: response.retry_after,
                })
            }
            Err(_) if !response.is_success() => Err(TransportError::Status {
                service: service.to_string(),
                status: response.status,
            }),
            Err(e) => {
                log::error!("[{service}] JSON parse failed: {e}");
                log::error!(
                    "[{service}] Raw response: {}",
                    truncate_for_log(&response.body)
                );
                Err(TransportError::Parse {
                    service: service.to_string(),
                    detail: e.to_string(),
                })
            }
        }
    }
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a response body for logging.
pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}
