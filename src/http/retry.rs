//! Retry classification for HTTP failures.
//!
//! Transport errors and 5xx responses are retried; client errors are surfaced
//! immediately as [`NonRetryableError`].

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of attempts for a single request.
pub const MAX_RETRIES: usize = 3;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// HTTP failures that will not succeed on retry.
#[derive(Debug, Error)]
pub enum NonRetryableError {
    #[error("rate limit exceeded for {0}; try again later or set GITHUB_TOKEN")]
    RateLimitExceeded(String),
    #[error("authentication failed for {0}; check GITHUB_TOKEN")]
    AuthenticationFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("access forbidden: {0}")]
    Forbidden(String),
    #[error("HTTP {status} from {url}")]
    ClientError { status: u16, url: String },
}

/// Classify a failed response. `Ok(())` means the failure is worth retrying.
pub fn classify_error(error: &reqwest::Error) -> Result<(), NonRetryableError> {
    let Some(status) = error.status() else {
        // Connection errors, timeouts, etc.
        return Ok(());
    };

    let url = error
        .url()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "<unknown url>".to_string());

    match status {
        StatusCode::UNAUTHORIZED => Err(NonRetryableError::AuthenticationFailed(url)),
        StatusCode::FORBIDDEN if error.to_string().contains("rate limit") => {
            Err(NonRetryableError::RateLimitExceeded(url))
        }
        StatusCode::FORBIDDEN => Err(NonRetryableError::Forbidden(url)),
        StatusCode::TOO_MANY_REQUESTS => Err(NonRetryableError::RateLimitExceeded(url)),
        StatusCode::NOT_FOUND => Err(NonRetryableError::NotFound(url)),
        s if s.is_client_error() => Err(NonRetryableError::ClientError {
            status: s.as_u16(),
            url,
        }),
        _ => Ok(()),
    }
}

/// Map an `error_for_status()` failure into an `anyhow::Error`, tagging
/// non-retryable failures so the retry loop can stop early.
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Ok(()) => anyhow::Error::from(error),
        Err(non_retryable) => anyhow::Error::from(non_retryable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn status_error(status: usize) -> reqwest::Error {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(status)
            .create_async()
            .await;

        let response = reqwest::Client::new()
            .get(server.url())
            .send()
            .await
            .unwrap();
        response.error_for_status().unwrap_err()
    }

    #[test]
    fn test_non_retryable_error_display() {
        let err = NonRetryableError::RateLimitExceeded("https://api.github.com".into());
        assert!(err.to_string().contains("rate limit"));
        assert!(err.to_string().contains("GITHUB_TOKEN"));

        let err = NonRetryableError::ClientError {
            status: 400,
            url: "https://api.github.com".into(),
        };
        assert_eq!(err.to_string(), "HTTP 400 from https://api.github.com");
    }

    #[tokio::test]
    async fn test_classify_error_unauthorized() {
        let err = status_error(401).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_forbidden() {
        let err = status_error(403).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_too_many_requests() {
        let err = status_error(429).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::RateLimitExceeded(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_not_found() {
        let err = status_error(404).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_other_client_error() {
        let err = status_error(422).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::ClientError { status: 422, .. })
        ));
    }

    #[tokio::test]
    async fn test_server_errors_are_retryable() {
        let err = status_error(503).await;
        assert!(classify_error(&err).is_ok());

        let err = check_retryable(status_error(500).await);
        assert!(err.downcast_ref::<NonRetryableError>().is_none());
    }

    #[tokio::test]
    async fn test_check_retryable_tags_client_errors() {
        let err = check_retryable(status_error(404).await);
        assert!(err.downcast_ref::<NonRetryableError>().is_some());
    }
}
