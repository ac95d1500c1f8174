use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("wa_echo_relay_statds")
        .with_description("WhatsApp echo relay statistics")
        .with_unit("event")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// Counts the outcome of a `POST /webhook` call: `echoed`, `ignored`, `failed` or `rejected`
pub fn incr_webhook_outcome_statds(outcome: &str) {
    incr_statds("webhook_outcome".to_string(), outcome.into())
}

/// Counts handshake attempts: `verified` or `rejected`
pub fn incr_handshake_statds(result: &str) {
    incr_statds("handshake".to_string(), result.into())
}
