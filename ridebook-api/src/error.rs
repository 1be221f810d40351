use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ridebook_core::FieldError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    /// Create-booking form failed validation.
    BookingRejected(Vec<FieldError>),
    NotFoundError(String),
    PayloadTooLarge(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BookingRejected(errors) => {
                let body = Json(json!({
                    "errors": errors,
                    "booked": false,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridebook_core::CoreError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_rejected_booking_shape() {
        let response = AppError::BookingRejected(vec![FieldError::body("email", "x", "bad")]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["booked"], false);
        assert_eq!(body["errors"][0]["path"], "email");
        assert_eq!(body["errors"][0]["location"], "body");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_detail() {
        let err: AppError = CoreError::StorageError("connection refused".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal Server Error");
    }
}
