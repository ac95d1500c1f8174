pub const MESSAGING_PRODUCT: &str = "whatsapp";
pub const SUBSCRIBE_MODE: &str = "subscribe";
pub const ECHO_PREFIX: &str = "Echo: ";
pub const TEXT_MESSAGE_TYPE: &str = "text";
pub const READ_STATUS: &str = "read";

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

pub const GREETING: &str = "WhatsApp Webhook Service. Consulta la documentación para comenzar.";
