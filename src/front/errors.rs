use derive_more::{Display, Error};
use ntex::{http, web};
use serde_json::json;

#[derive(Debug, Display, Error)]
pub enum UserError {
    #[display("Not Found")]
    UrlNotFound,
    #[display("Verification failed")]
    Forbidden,
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        logfire::warn!("{error}", error = format!("{:?}", self));

        web::HttpResponse::build(self.status_code()).json(&json!({ "detail": self.to_string() }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::Forbidden => http::StatusCode::FORBIDDEN,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    #[display("{_0}")]
    ExternalServiceError(#[error(not(source))] String),
    #[display("{_0}")]
    InternalServerError(#[error(not(source))] String),
}

impl ServerError {
    fn get_error_message(&self) -> String {
        match self {
            ServerError::ExternalServiceError(msg) => format!("[ExternalServiceError] {msg}"),
            ServerError::InternalServerError(msg) => format!("[InternalServerError] {msg}"),
        }
    }
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        logfire::error!("{error}", error = self.get_error_message());

        web::HttpResponse::build(self.status_code()).json(&json!({ "detail": self.to_string() }))
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}
