//! Relay configuration loaded from the environment.
//!
//! The configuration is read once in `main` and handed to every worker
//! through the application state. Nothing mutates it after startup.
//!
//! # Security Notes
//! - `API_TOKEN`, `WEBHOOK_VERIFY_TOKEN` and `APP_SECRET` are sensitive and
//!   must never be logged
//! - `AppConfig` must not implement `Debug`

use envconfig::Envconfig;
use serde::Serialize;

/// Relay configuration.
///
/// Optional fields are `None` when the variable is absent; the service still
/// starts so `/status` can report what is missing.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// 🔒 SENSITIVE: token expected in the `hub.verify_token` handshake parameter
    #[envconfig(from = "WEBHOOK_VERIFY_TOKEN")]
    pub webhook_verify_token: Option<String>,

    /// 🔒 SENSITIVE: bearer token for the Cloud API
    #[envconfig(from = "API_TOKEN")]
    pub api_token: Option<String>,

    /// WhatsApp Business phone number ID used as the sender (SEMI-SENSITIVE)
    #[envconfig(from = "BUSINESS_PHONE")]
    pub business_phone: Option<String>,

    /// Graph API version segment, e.g. "v21.0"
    #[envconfig(from = "API_VERSION", default = "v21.0")]
    pub api_version: String,

    /// Graph API host, overridable for local testing
    #[envconfig(from = "API_BASE_URL", default = "https://graph.facebook.com")]
    pub api_base_url: String,

    /// 🔒 SENSITIVE: app secret used to check `X-Hub-Signature-256`.
    /// Signature checks are skipped when unset.
    #[envconfig(from = "APP_SECRET")]
    pub app_secret: Option<String>,

    /// Host address for web server binding
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// Port for web server binding
    #[envconfig(from = "PORT", default = "8000")]
    pub port: u16,
}

/// Presence flags reported by `GET /status`
#[derive(Debug, Serialize, PartialEq)]
pub struct ConfigStatus {
    pub webhook_token_configured: bool,
    pub api_token_configured: bool,
    pub business_phone_configured: bool,
    pub api_version: String,
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl AppConfig {
    /// Versioned Graph API base, e.g. `https://graph.facebook.com/v21.0`
    pub fn base_url(&self) -> String {
        format!(
            "{host}/{version}",
            host = self.api_base_url.trim_end_matches('/'),
            version = self.api_version
        )
    }

    /// Endpoint for sending messages from the configured business phone.
    ///
    /// `None` when no business phone is configured.
    pub fn whatsapp_send_msg_endpoint(&self) -> Option<String> {
        self.business_phone
            .as_deref()
            .filter(|phone| !phone.is_empty())
            .map(|phone| format!("{base}/{phone}/messages", base = self.base_url()))
    }

    /// Checks a handshake token against the configured one.
    ///
    /// An unset verify token never matches.
    pub fn verify_token_matches(&self, token: &str) -> bool {
        self.webhook_verify_token
            .as_deref()
            .is_some_and(|expected| !expected.is_empty() && expected == token)
    }

    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            webhook_token_configured: is_set(&self.webhook_verify_token),
            api_token_configured: is_set(&self.api_token),
            business_phone_configured: is_set(&self.business_phone),
            api_version: self.api_version.clone(),
        }
    }
}

#[cfg(test)]
impl AppConfig {
    /// Fully populated configuration pointing at `api_base_url`
    pub fn for_tests(api_base_url: &str) -> Self {
        Self {
            webhook_verify_token: Some("verify-secret".into()),
            api_token: Some("test-token".into()),
            business_phone: Some("1234567890".into()),
            api_version: "v21.0".into(),
            api_base_url: api_base_url.into(),
            app_secret: None,
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}
