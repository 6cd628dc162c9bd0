//! HTTP mapping for `AppError`. Every error leaves as a short plain-text body.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use eb_core::error::AppError;

/// Web-facing wrapper so `AppError` can be returned straight from handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The text sent to the client. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match &self.0 {
            AppError::Forbidden(msg)
            | AppError::RateLimitExceeded(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::Duplicate => "Duplicate message".to_string(),
            AppError::BannedWord => "NG word detected".to_string(),
            AppError::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(AppError::from(err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Duplicate | AppError::BannedWord | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = &self.0 {
            log::error!("internal error: {detail}");
        }
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (AppError::Forbidden("Forbidden Region".into()), 403),
            (AppError::RateLimitExceeded("Wait 10s".into()), 429),
            (AppError::Duplicate, 400),
            (AppError::BannedWord, 400),
            (AppError::ValidationError("Message is required".into()), 400),
            (AppError::Internal("disk full".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code().as_u16(), status);
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError(AppError::Internal("database is locked".into()));
        assert_eq!(err.public_message(), "Internal Server Error");
    }
}
