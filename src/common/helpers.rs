// Helper functions for safe logging and bounded store calls

use std::future::Future;
use std::time::Duration;
use tracing::error;

use super::ApiError;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            format!("{}***@{}", &parts[0][..1], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
///
/// # Example
/// ```ignore
/// let masked = safe_token_log("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
/// // Returns: "eyJh...CJ9"
/// ```
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Runs a user store call under a deadline
///
/// A timeout surfaces as `ServiceUnavailable`, a driver failure as `DatabaseError`.
pub async fn bounded<T, F>(limit: Duration, operation: &'static str, call: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ApiError::DatabaseError(e)),
        Err(_) => {
            error!(
                operation = operation,
                timeout_secs = limit.as_secs(),
                "User store call timed out"
            );
            Err(ApiError::ServiceUnavailable(
                "user store did not respond in time".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
        assert_eq!(safe_email_log("a@x"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
    }

    #[test]
    fn test_safe_token_log_keeps_edges_only() {
        assert_eq!(safe_token_log("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(safe_token_log("short"), "***");
    }

    #[tokio::test]
    async fn test_bounded_reports_timeout() {
        let result: Result<(), ApiError> = bounded(Duration::from_millis(10), "sleep", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ApiError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_errors() {
        let result: Result<(), ApiError> = bounded(Duration::from_secs(1), "fail", async {
            Err(sqlx::Error::RowNotFound)
        })
        .await;

        assert!(matches!(result, Err(ApiError::DatabaseError(_))));
    }
}
