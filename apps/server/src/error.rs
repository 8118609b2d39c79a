use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prospere_core::errors::Error as CoreError;
use prospere_core::pix::{PixError, RetryClass};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Pix(#[from] PixError),
    #[error("Not Found")]
    NotFound,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retryable: Option<bool>,
}

fn pix_response(err: &PixError) -> (StatusCode, String, Option<bool>) {
    let status = match (err, err.retry_class()) {
        (PixError::InvalidAmount(_), _) => StatusCode::BAD_REQUEST,
        (_, RetryClass::Transient) => StatusCode::SERVICE_UNAVAILABLE,
        (_, RetryClass::Permanent) => StatusCode::BAD_GATEWAY,
    };
    tracing::warn!("PIX request failed: {}", err);
    (status, err.user_message().to_string(), Some(err.is_transient()))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg, retryable) = match &self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string(), None),
                CoreError::ConstraintViolation(_) => (StatusCode::CONFLICT, e.to_string(), None),
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string(), None),
                CoreError::Repository(_) => {
                    tracing::error!("Request failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
                }
            },
            ApiError::Pix(e) => pix_response(e),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string(), None),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
            retryable,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(CoreError::invalid_input("bad")), StatusCode::BAD_REQUEST),
            (
                ApiError::from(CoreError::ConstraintViolation("dup".into())),
                StatusCode::CONFLICT,
            ),
            (ApiError::from(CoreError::NotFound("x".into())), StatusCode::NOT_FOUND),
            (ApiError::from(PixError::Timeout), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::from(PixError::Unauthorized), StatusCode::BAD_GATEWAY),
            (
                ApiError::from(PixError::InvalidAmount("0".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::from(CoreError::Repository("lock poisoned".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
