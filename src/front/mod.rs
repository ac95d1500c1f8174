pub mod errors;
pub mod server;

use crate::{config, webhook};

/// Per-worker application state shared by every handler
pub struct AppState {
    pub config: config::AppConfig,
    pub sender: webhook::whatsapp::client::ImplMessageSender,
}
