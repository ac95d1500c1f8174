//! # WhatsApp Outgoing Message Schemas
//!
//! JSON bodies posted to the Cloud API `/messages` endpoint.

use crate::consts;
use serde::{Deserialize, Serialize};

/// Any request body accepted by the `/messages` endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    Text(OutgoingTextMessage),
    ReadReceipt(ReadReceipt),
    Interactive(OutgoingInteractiveMessage),
}

impl OutgoingMessage {
    /// Plain text message
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Text(OutgoingTextMessage {
            messaging_product: consts::MESSAGING_PRODUCT.to_string(),
            to: to.into(),
            text: OutgoingTextContent { body: body.into() },
            context: None,
        })
    }

    /// Text message shown as a reply to `reply_to`
    pub fn text_reply(
        to: impl Into<String>,
        body: impl Into<String>,
        reply_to: impl Into<String>,
    ) -> Self {
        Self::Text(OutgoingTextMessage {
            messaging_product: consts::MESSAGING_PRODUCT.to_string(),
            to: to.into(),
            text: OutgoingTextContent { body: body.into() },
            context: Some(ReplyContext {
                message_id: reply_to.into(),
            }),
        })
    }

    /// Marks an inbound message as read
    pub fn read_receipt(message_id: impl Into<String>) -> Self {
        Self::ReadReceipt(ReadReceipt {
            messaging_product: consts::MESSAGING_PRODUCT.to_string(),
            status: consts::READ_STATUS.to_string(),
            message_id: message_id.into(),
        })
    }

    /// Interactive message with up to three reply buttons
    pub fn interactive_buttons(
        to: impl Into<String>,
        body: impl Into<String>,
        buttons: Vec<ReplyButton>,
    ) -> Self {
        Self::Interactive(OutgoingInteractiveMessage {
            messaging_product: consts::MESSAGING_PRODUCT.to_string(),
            to: to.into(),
            msg_type: "interactive".to_string(),
            interactive: InteractiveContent {
                interactive_type: "button".to_string(),
                body: InteractiveBody { text: body.into() },
                action: InteractiveAction { buttons },
            },
        })
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            OutgoingMessage::Text(msg) if msg.context.is_some() => "text_reply",
            OutgoingMessage::Text(_) => "text",
            OutgoingMessage::ReadReceipt(_) => "read_receipt",
            OutgoingMessage::Interactive(_) => "interactive",
        }
    }
}

/// Text message to send to WhatsApp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingTextMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    /// Recipient's WhatsApp ID (phone number)
    pub to: String,
    pub text: OutgoingTextContent,
    /// Set when the message replies to an inbound one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ReplyContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingTextContent {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyContext {
    /// ID of the message being replied to
    pub message_id: String,
}

/// Read receipt for an inbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadReceipt {
    pub messaging_product: String,
    /// Always "read"
    pub status: String,
    pub message_id: String,
}

/// Interactive button message to send to WhatsApp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingInteractiveMessage {
    pub messaging_product: String,
    pub to: String,
    /// Message type, "interactive"
    #[serde(rename = "type")]
    pub msg_type: String,
    pub interactive: InteractiveContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractiveContent {
    /// Type of interactive message, "button"
    #[serde(rename = "type")]
    pub interactive_type: String,
    pub body: InteractiveBody,
    pub action: InteractiveAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractiveBody {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractiveAction {
    pub buttons: Vec<ReplyButton>,
}

/// Reply button shown under an interactive message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyButton {
    /// Button type, "reply"
    #[serde(rename = "type")]
    pub button_type: String,
    pub reply: ButtonReply,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonReply {
    /// Payload id sent back when the button is tapped
    pub id: String,
    /// Button label
    pub title: String,
}

impl ReplyButton {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            button_type: "reply".to_string(),
            reply: ButtonReply {
                id: id.into(),
                title: title.into(),
            },
        }
    }
}

/// Response from WhatsApp API when sending a message
#[derive(Debug, Default, Deserialize)]
pub struct WhatsAppMessageResponse {
    #[serde(default)]
    pub messaging_product: Option<String>,
    /// Array of contacts (recipients)
    #[serde(default)]
    pub contacts: Vec<WhatsAppContact>,
    /// Array of messages sent
    #[serde(default)]
    pub messages: Vec<WhatsAppMessageStatus>,
}

/// Contact information in response
#[derive(Debug, Deserialize)]
pub struct WhatsAppContact {
    /// WhatsApp ID of the contact
    pub wa_id: String,
    /// Input phone number
    pub input: String,
}

/// Message status in response
#[derive(Debug, Deserialize)]
pub struct WhatsAppMessageStatus {
    /// Message ID
    pub id: String,
}
