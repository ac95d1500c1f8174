//! Handlers not linked to the webhook

use ntex::web;
use serde_json::json;

use crate::{
    consts,
    front::{AppState, errors},
};

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

/// Greeting confirming the service is up
#[web::get("/")]
pub async fn index() -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok().json(&json!({ "message": consts::GREETING })))
}

/// Reports which required settings are present, never their values
#[web::get("/status")]
pub async fn status(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok().json(&json!({
        "status": "active",
        "config": app_state.config.status(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, webhook::whatsapp::client::MockMessageSender};
    use ntex::http::StatusCode;
    use ntex::web::test;
    use serde_json::Value;

    fn app_state(config: AppConfig) -> AppState {
        AppState {
            config,
            sender: Box::new(MockMessageSender::new()),
        }
    }

    #[ntex::test]
    async fn test_status_reports_config_presence() {
        let mut config = AppConfig::for_tests("http://localhost");
        config.api_token = None;

        let app = test::init_service(
            web::App::new()
                .state(app_state(config))
                .service((index, status)),
        )
        .await;

        let req = test::TestRequest::get().uri("/status").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(
            body,
            json!({
                "status": "active",
                "config": {
                    "webhook_token_configured": true,
                    "api_token_configured": false,
                    "business_phone_configured": true,
                    "api_version": "v21.0"
                }
            })
        );
    }

    #[ntex::test]
    async fn test_index_and_not_found() {
        let app = test::init_service(
            web::App::new()
                .state(app_state(AppConfig::for_tests("http://localhost")))
                .service(index)
                .default_service(web::route().to(serve_not_found)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body["message"], consts::GREETING);
        assert_eq!(
            body["message"],
            "WhatsApp Webhook Service. Consulta la documentación para comenzar."
        );

        let req = test::TestRequest::get().uri("/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body, json!({ "detail": "Not Found" }));
    }
}
