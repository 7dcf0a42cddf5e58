//! Outbound push notifications
//!
//! Delivery is best-effort: `notify` never fails from the caller's point of
//! view. Implementations log delivery problems and move on.

mod pushover;

pub use pushover::{PushoverNotifier, PUSHOVER_URL};

use async_trait::async_trait;
use thiserror::Error;

/// Sink for short text events
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str);
}

/// Delivery failure, logged by the notifier and never propagated
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Notifier used when no push credentials are configured
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, text: &str) {
        tracing::info!(message = %text, "Notification (log only)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        LogNotifier.notify("Recording job interest").await;
    }

    #[test]
    fn test_rejected_error_message() {
        let err = NotifierError::Rejected {
            status: 400,
            body: "invalid token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "notification rejected with HTTP 400: invalid token"
        );
    }
}
