//! # WhatsApp Webhook Schemas
//!
//! Data structures for the payloads WhatsApp posts to the webhook, plus the
//! lookups used to reach into them.
//!
//! The relay only ever consults the first entry, the first change and the
//! first message of a delivery:
//!
//! ```text
//! { "entry": [ { "changes": [ { "value": { "messages": [ {..} ], "statuses": [ {..} ] } } ] } ] }
//! ```
//!
//! Every step of that path is optional. A missing key, a value of the wrong
//! JSON type or an empty array ends the lookup with `None`, which callers treat
//! as "nothing to do" rather than as an error. Only the fields the relay reads
//! are looked at, so unexpected shapes elsewhere in a message are ignored.

use crate::consts;
use anyhow::{Context, Result};
use serde_json::Value;

/// Returns `entry[0].changes[0].value`, if every step is present
pub fn first_change_value(payload: &Value) -> Option<&Value> {
    payload
        .get("entry")?
        .as_array()?
        .first()?
        .get("changes")?
        .as_array()?
        .first()?
        .get("value")
}

/// Returns the first message of the first change.
///
/// A message that is not a JSON object is treated as absent.
pub fn first_message(payload: &Value) -> Option<Message> {
    let raw = first_change_value(payload)?
        .get("messages")?
        .as_array()?
        .first()?;

    Message::from_value(raw)
}

/// Returns the delivery status updates carried by the first change
pub fn first_change_statuses(payload: &Value) -> Vec<Status> {
    first_change_value(payload)
        .and_then(|value| value.get("statuses"))
        .and_then(Value::as_array)
        .map(|statuses| statuses.iter().filter_map(Status::from_value).collect())
        .unwrap_or_default()
}

/// String field of a JSON object; `None` if absent or not a string
fn str_field(raw: &Value, name: &str) -> Option<String> {
    raw.get(name).and_then(Value::as_str).map(str::to_string)
}

/// Message object
#[derive(Debug, Default, PartialEq)]
pub struct Message {
    /// Message ID (`wamid.*`)
    pub id: Option<String>,
    /// Sender's WhatsApp ID (phone number)
    pub from: Option<String>,
    /// Message type (text, image, video, document, etc.)
    pub msg_type: Option<String>,
    /// Text message content (if type is "text")
    pub text: Option<TextMessage>,
}

/// Text message content
#[derive(Debug, Default, PartialEq)]
pub struct TextMessage {
    pub body: Option<String>,
}

/// Borrowed view of a text message with every field needed to answer it
#[derive(Debug, PartialEq)]
pub struct TextReceived<'a> {
    pub id: &'a str,
    pub from: &'a str,
    pub body: &'a str,
}

impl Message {
    /// Reads the fields the relay uses from a raw message object.
    ///
    /// Each field is looked up on its own; a field with an unexpected JSON
    /// type reads as `None` and does not affect the others.
    pub fn from_value(raw: &Value) -> Option<Self> {
        raw.is_object().then(|| Self {
            id: str_field(raw, "id"),
            from: str_field(raw, "from"),
            msg_type: str_field(raw, "type"),
            text: raw.get("text").map(|text| TextMessage {
                body: str_field(text, "body"),
            }),
        })
    }

    pub fn is_text(&self) -> bool {
        self.msg_type.as_deref() == Some(consts::TEXT_MESSAGE_TYPE)
    }

    /// Returns the text content of a text message.
    ///
    /// `Ok(None)` for any other message type. A text message lacking its id,
    /// sender or body is an error.
    pub fn text_content(&self) -> Result<Option<TextReceived<'_>>> {
        if !self.is_text() {
            return Ok(None);
        }

        let id = self.id.as_deref().context("text message without `id`")?;
        let from = self
            .from
            .as_deref()
            .context("text message without `from`")?;
        let body = self
            .text
            .as_ref()
            .and_then(|text| text.body.as_deref())
            .context("text message without `text.body`")?;

        Ok(Some(TextReceived { id, from, body }))
    }
}

/// Status update for sent messages
#[derive(Debug, PartialEq)]
pub struct Status {
    /// Message ID
    pub id: Option<String>,
    /// Status (sent, delivered, read, failed)
    pub status: Option<String>,
}

impl Status {
    pub fn from_value(raw: &Value) -> Option<Self> {
        raw.is_object().then(|| Self {
            id: str_field(raw, "id"),
            status: str_field(raw, "status"),
        })
    }
}
