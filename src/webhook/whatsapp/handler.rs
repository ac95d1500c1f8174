//! # WhatsApp Webhook Handler
//!
//! Business logic behind `POST /webhook`: find the first inbound message and,
//! when it is a text message, echo it back and mark it as read.
//!
//! Deliveries are not deduplicated. WhatsApp delivers at least once, so the
//! same message id may be echoed more than once.

use super::{
    client::MessageSender,
    schemas::{self, OutgoingMessage},
};
use crate::consts;
use anyhow::{Context, Result};
use serde_json::Value;

/// What a webhook delivery resulted in
#[derive(Debug, PartialEq)]
pub enum WebhookOutcome {
    /// An echo reply and a read receipt were sent for `message_id`
    Echoed { message_id: String },
    /// No message, or a message type the relay does not answer
    Ignored,
}

impl WebhookOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            WebhookOutcome::Echoed { .. } => "echoed",
            WebhookOutcome::Ignored => "ignored",
        }
    }
}

/// Logs delivery status updates; the relay takes no action on them
fn log_statuses(payload: &Value) {
    for update in schemas::first_change_statuses(payload) {
        logfire::debug!(
            "Status update {status} for message {id}",
            status = update.status.unwrap_or_default(),
            id = update.id.unwrap_or_default()
        );
    }
}

/// Main webhook processor
///
/// Sends the echo reply first and the read receipt second. If the echo fails
/// the read receipt is not attempted and the error is returned.
///
/// # Arguments
///
/// * `payload` - The webhook payload from WhatsApp, as parsed JSON
/// * `sender` - Outbound side used for the echo and the read receipt
pub async fn process_webhook(payload: &Value, sender: &dyn MessageSender) -> Result<WebhookOutcome> {
    log_statuses(payload);

    let Some(message) = schemas::first_message(payload) else {
        logfire::debug!("Webhook delivery without a message");
        return Ok(WebhookOutcome::Ignored);
    };

    let Some(text) = message.text_content()? else {
        logfire::info!(
            "Ignoring message of type {type}",
            r#type = message.msg_type.clone().unwrap_or_default()
        );
        return Ok(WebhookOutcome::Ignored);
    };

    let echo = OutgoingMessage::text_reply(
        text.from,
        format!("{}{}", consts::ECHO_PREFIX, text.body),
        text.id,
    );
    sender
        .send_message(&echo)
        .await
        .context("Failed to send echo reply")?;

    sender
        .send_message(&OutgoingMessage::read_receipt(text.id))
        .await
        .context("Failed to send read receipt")?;

    logfire::info!("Echoed message {id}", id = text.id.to_string());

    Ok(WebhookOutcome::Echoed {
        message_id: text.id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::whatsapp::client::MockMessageSender;
    use mockall::Sequence;
    use serde_json::json;

    fn text_payload(id: &str, from: &str, body: &str) -> Value {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "123456",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": { "display_phone_number": "+1234567890", "phone_number_id": "phone123" },
                        "contacts": [{ "profile": { "name": "Ana" }, "wa_id": from }],
                        "messages": [{
                            "from": from,
                            "id": id,
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": { "body": body }
                        }]
                    }
                }]
            }]
        })
    }

    fn expect_payload(mock: &mut MockMessageSender, seq: &mut Sequence, expected: Value) {
        mock.expect_send_message()
            .withf(move |message| serde_json::to_value(message).is_ok_and(|sent| sent == expected))
            .times(1)
            .in_sequence(seq)
            .returning(|_| Ok(json!({ "messages": [{ "id": "wamid.out" }] })));
    }

    #[ntex::test]
    async fn test_text_message_is_echoed_then_marked_read() {
        let mut mock = MockMessageSender::new();
        let mut seq = Sequence::new();
        expect_payload(
            &mut mock,
            &mut seq,
            json!({
                "messaging_product": "whatsapp",
                "to": "15551234567",
                "text": { "body": "Echo: hi" },
                "context": { "message_id": "wamid.1" }
            }),
        );
        expect_payload(
            &mut mock,
            &mut seq,
            json!({ "messaging_product": "whatsapp", "status": "read", "message_id": "wamid.1" }),
        );

        let outcome = process_webhook(&text_payload("wamid.1", "15551234567", "hi"), &mock)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Echoed {
                message_id: "wamid.1".into()
            }
        );
    }

    #[ntex::test]
    async fn test_numeric_timestamp_is_still_echoed() {
        let mut mock = MockMessageSender::new();
        let mut seq = Sequence::new();
        expect_payload(
            &mut mock,
            &mut seq,
            json!({
                "messaging_product": "whatsapp",
                "to": "15551234567",
                "text": { "body": "Echo: hi" },
                "context": { "message_id": "wamid.1" }
            }),
        );
        expect_payload(
            &mut mock,
            &mut seq,
            json!({ "messaging_product": "whatsapp", "status": "read", "message_id": "wamid.1" }),
        );

        let payload = json!({
            "entry": [{ "changes": [{ "value": { "messages": [{
                "id": "wamid.1",
                "from": "15551234567",
                "timestamp": 1700000000,
                "type": "text",
                "text": { "body": "hi" }
            }] } }] }]
        });

        let outcome = process_webhook(&payload, &mock).await.unwrap();

        assert_eq!(outcome.label(), "echoed");
    }

    #[ntex::test]
    async fn test_duplicate_deliveries_are_each_answered() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_message()
            .times(4)
            .returning(|_| Ok(json!({})));

        let payload = text_payload("wamid.dup", "15551234567", "again");
        for _ in 0..2 {
            let outcome = process_webhook(&payload, &mock).await.unwrap();
            assert_eq!(outcome.label(), "echoed");
        }
    }

    #[ntex::test]
    async fn test_non_text_message_is_ignored() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_message().never();

        let payload = json!({
            "entry": [{ "changes": [{ "value": { "messages": [{
                "from": "15551234567",
                "id": "wamid.img",
                "type": "image",
                "image": { "id": "media-1", "mime_type": "image/jpeg" }
            }] } }] }]
        });

        let outcome = process_webhook(&payload, &mock).await.unwrap();

        assert_eq!(outcome, WebhookOutcome::Ignored);
    }

    #[ntex::test]
    async fn test_missing_message_path_is_ignored() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_message().never();

        let payloads = [
            json!({}),
            json!({ "entry": [] }),
            json!({ "entry": [{ "changes": [{ "value": { "statuses": [
                { "id": "wamid.out", "status": "delivered", "timestamp": "1700000001", "recipient_id": "15551234567" }
            ] } }] }] }),
        ];

        for payload in payloads {
            assert_eq!(
                process_webhook(&payload, &mock).await.unwrap(),
                WebhookOutcome::Ignored
            );
        }
    }

    #[ntex::test]
    async fn test_failed_echo_skips_read_receipt() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_message()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("WhatsApp API returned error status 500 Internal Server Error: oops")));

        let err = process_webhook(&text_payload("wamid.1", "15551234567", "hi"), &mock)
            .await
            .unwrap_err();

        let detail = format!("{err:#}");
        assert!(detail.starts_with("Failed to send echo reply"), "{detail}");
        assert!(detail.contains("500 Internal Server Error: oops"), "{detail}");
    }

    #[ntex::test]
    async fn test_failed_read_receipt_is_an_error() {
        let mut mock = MockMessageSender::new();
        let mut seq = Sequence::new();
        mock.expect_send_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!({})));
        mock.expect_send_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let err = process_webhook(&text_payload("wamid.1", "15551234567", "hi"), &mock)
            .await
            .unwrap_err();

        assert_eq!(format!("{err:#}"), "Failed to send read receipt: connection reset");
    }

    #[ntex::test]
    async fn test_text_message_without_sender_is_an_error() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_message().never();

        let payload = json!({
            "entry": [{ "changes": [{ "value": { "messages": [
                { "id": "wamid.1", "type": "text", "text": { "body": "hi" } }
            ] } }] }]
        });

        let err = process_webhook(&payload, &mock).await.unwrap_err();

        assert_eq!(err.to_string(), "text message without `from`");
    }
}
