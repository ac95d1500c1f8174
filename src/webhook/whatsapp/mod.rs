//! WhatsApp webhook integration module
//!
//! HTTP route handlers for the WhatsApp Cloud API webhook, the logic that
//! answers inbound messages, and the client used to talk back to the API.
//!
//! ## Submodules
//!
//! - [`handler`] - Echo and read-receipt logic for inbound deliveries
//! - [`routes`] - HTTP endpoint handlers (handshake and receiver)
//! - [`schemas`] - Data structures for incoming payloads and outgoing requests
//! - [`client`] - WhatsApp API client for sending messages
//! - [`security`] - `X-Hub-Signature-256` verification

pub mod client;
pub mod handler;
pub mod routes;
pub mod schemas;
pub mod security;

// Re-export commonly used items for convenience
pub use routes::{receive, verify};
