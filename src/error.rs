use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{
    mail::MailError,
    types::{FieldError, MessageResponse},
};

pub const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("rate limited: {0}")]
    RateLimited(&'static str),

    #[error("route not found")]
    NotFound,

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Mail(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => MessageResponse {
                success: false,
                message: "Validation failed".to_string(),
                errors: Some(errors.clone()),
            },
            ApiError::BadRequest(message) => MessageResponse::failure(message.clone()),
            ApiError::RateLimited(message) => MessageResponse::failure(*message),
            ApiError::NotFound => MessageResponse::failure("Route not found"),
            ApiError::Mail(error) => {
                tracing::error!("Contact form error: {}", error);
                MessageResponse::failure(SEND_FAILED_MESSAGE)
            }
            ApiError::Internal(error) => {
                tracing::error!("Unhandled error: {}", error);
                MessageResponse::failure("Something went wrong!")
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
