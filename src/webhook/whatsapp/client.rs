//! # WhatsApp API Client
//!
//! This module provides a client for sending messages to WhatsApp Business API.
//! Every request is a bearer-authenticated `POST {base}/{phone_id}/messages`;
//! there is no retry or backoff, a failed call is returned to the caller as is.

use super::schemas::{OutgoingMessage, ReplyButton, WhatsAppMessageResponse};
use crate::config::AppConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Sends message requests to the Cloud API.
///
/// Handlers depend on this trait rather than on [`WhatsAppClient`] so tests
/// can substitute the outbound side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Posts `message` and returns the parsed response body
    async fn send_message(&self, message: &OutgoingMessage) -> Result<serde_json::Value>;
}

pub type ImplMessageSender = Box<dyn MessageSender>;

/// WhatsApp API client for sending messages
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// Message endpoint, `None` if no business phone is configured
    endpoint: Option<String>,
    /// Authentication token
    auth_token: String,
}

impl WhatsAppClient {
    /// Creates a new WhatsApp client
    pub fn new(app_config: &AppConfig) -> Self {
        Self::with_client(reqwest::Client::new(), app_config)
    }

    pub fn with_client(client: reqwest::Client, app_config: &AppConfig) -> Self {
        Self {
            client,
            endpoint: app_config.whatsapp_send_msg_endpoint(),
            auth_token: app_config.api_token.clone().unwrap_or_default(),
        }
    }

    /// Sends a text message
    ///
    /// # Arguments
    /// * `to` - Recipient's WhatsApp ID (phone number with country code)
    /// * `body` - Message text
    pub async fn send_text_message(&self, to: &str, body: &str) -> Result<WhatsAppMessageResponse> {
        let response = self
            .send_message(&OutgoingMessage::text(to, body))
            .await?;
        serde_json::from_value(response).context("Failed to parse WhatsApp API response")
    }

    /// Sends an interactive message with reply buttons
    ///
    /// # Arguments
    /// * `to` - Recipient's WhatsApp ID
    /// * `body` - Text shown above the buttons
    /// * `buttons` - Reply buttons, at most three are accepted by WhatsApp
    pub async fn send_interactive_message(
        &self,
        to: &str,
        body: &str,
        buttons: Vec<ReplyButton>,
    ) -> Result<WhatsAppMessageResponse> {
        let response = self
            .send_message(&OutgoingMessage::interactive_buttons(to, body, buttons))
            .await?;
        serde_json::from_value(response).context("Failed to parse WhatsApp API response")
    }

    /// Marks an inbound message as read
    pub async fn mark_as_read(&self, message_id: &str) -> Result<serde_json::Value> {
        self.send_message(&OutgoingMessage::read_receipt(message_id))
            .await
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    #[tracing::instrument(skip_all, fields(kind = message.kind()))]
    async fn send_message(&self, message: &OutgoingMessage) -> Result<serde_json::Value> {
        let endpoint = self
            .endpoint
            .as_deref()
            .context("BUSINESS_PHONE is not configured")?;

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.auth_token)
            .json(message)
            .send()
            .await
            .context("Failed to send request to WhatsApp API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            anyhow::bail!("WhatsApp API returned error status {}: {}", status, body);
        }

        response
            .json::<serde_json::Value>()
            .await
            .context("Failed to parse WhatsApp API response")
    }
}
