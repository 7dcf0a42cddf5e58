//! Pushover delivery

use super::{Notifier, NotifierError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends each event as a Pushover message
pub struct PushoverNotifier {
    client: Client,
    url: String,
    token: String,
    user: String,
}

#[derive(Debug, Serialize)]
struct PushoverForm<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
}

impl PushoverNotifier {
    pub fn new(
        token: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<Self, NotifierError> {
        Self::with_url(PUSHOVER_URL, token, user)
    }

    pub fn with_url(
        url: impl Into<String>,
        token: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<Self, NotifierError> {
        let client = Client::builder().timeout(DELIVERY_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            token: token.into(),
            user: user.into(),
        })
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(&self.url)
            .form(&PushoverForm {
                token: &self.token,
                user: &self.user,
                message: text,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotifierError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, text: &str) {
        match self.deliver(text).await {
            Ok(()) => tracing::debug!("Notification delivered"),
            Err(e) => tracing::warn!(error = %e, "Notification delivery failed"),
        }
    }
}
