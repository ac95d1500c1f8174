//! # WhatsApp Echo Relay
//!
//! Main entry point for the webhook relay. Loads configuration, sets up
//! logging and metrics, and serves the webhook, status and greeting routes.

pub mod config;
pub mod consts;
pub mod front;
pub mod metric;
pub mod webhook;

use anyhow::Context;
use envconfig::Envconfig;
use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use ntex_cors::Cors;
use webhook::whatsapp::client::WhatsAppClient;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, the process environment is used as is
    let _ = dotenvy::dotenv();

    let app_config = config::AppConfig::init_from_env()
        .context("failed to load app config from environment")?;

    // Initialize logging and metrics
    let shutdown_handler = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent)
        .finish()?;

    let whatsapp_client = WhatsAppClient::new(&app_config);

    configure_and_run_server(app_config, whatsapp_client).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Creates application state from the provided services
fn create_app_state(
    app_config: config::AppConfig,
    whatsapp_client: WhatsAppClient,
) -> front::AppState {
    front::AppState {
        config: app_config,
        sender: Box::new(whatsapp_client),
    }
}

/// Configures and starts the web server
async fn configure_and_run_server(
    app_config: config::AppConfig,
    whatsapp_client: WhatsAppClient,
) -> anyhow::Result<()> {
    let server_addr = (app_config.host.clone(), app_config.port);

    logfire::info!(
        "Starting webhook relay on {host}:{port}",
        host = app_config.host.clone(),
        port = i64::from(app_config.port)
    );

    web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS"])
                    .finish(),
            )
            .wrap(web::middleware::Logger::default())
            .state(create_app_state(
                app_config.clone(),
                whatsapp_client.clone(),
            ))
            .configure(webhook::routes::whatsapp)
            .service((front::server::index, front::server::status))
            .default_service(web::route().to(front::server::serve_not_found))
    })
    .bind(server_addr)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
