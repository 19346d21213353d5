//! Shared HTTP client and status mapping.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::LogiqError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default HTTP client");
                reqwest::Client::new()
            })
    })
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> LogiqError {
    match status {
        401 | 403 => LogiqError::Authentication(error_message(body)),
        404 => LogiqError::ModelNotFound(error_message(body)),
        429 => LogiqError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => LogiqError::api(status, error_message(body)),
    }
}

/// `error.message` from a Google-style error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Google reports retry hints as `RetryInfo` details with `retryDelay: "12s"`.
fn extract_retry_after(body: &str) -> Option<u64> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    value
        .get("error")?
        .get("details")?
        .as_array()?
        .iter()
        .find_map(|d| d.get("retryDelay").and_then(|r| r.as_str()))
        .and_then(|delay| delay.strip_suffix('s'))
        .and_then(|secs| secs.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_auth_statuses() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid"}}"#;
        match status_to_error(403, body) {
            LogiqError::Authentication(msg) => assert_eq!(msg, "API key not valid"),
            other => panic!("expected Authentication, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_reads_retry_delay() {
        let body = r#"{"error": {"code": 429, "message": "quota", "details": [
            {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "12s"}
        ]}}"#;
        match status_to_error(429, body) {
            LogiqError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, Some(12_000)),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn other_statuses_keep_raw_body() {
        match status_to_error(500, "upstream exploded") {
            LogiqError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
