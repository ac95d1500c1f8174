//! # WhatsApp Message Schemas
//!
//! This module contains data structures for WhatsApp Business API.
//!
//! - `incoming`: webhook payloads received from WhatsApp and the lookups into them
//! - `outgoing`: message requests sent to WhatsApp

pub mod incoming;
pub mod outgoing;

// Re-export commonly used types
pub use incoming::*;
pub use outgoing::*;
