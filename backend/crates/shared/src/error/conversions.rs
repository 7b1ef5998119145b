//! Error conversions - rendering [`AppError`] as an HTTP response

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        use crate::envelope::FailureBody;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(FailureBody::new(self.message()))).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_into_response_renders_failure_envelope() {
        let response = AppError::bad_request("too many files").into_response();
        assert_eq!(response.status(), 400);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: crate::envelope::FailureBody = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        assert_eq!(body.error, "too many files");
    }

    #[tokio::test]
    async fn test_into_response_hides_source() {
        let err = AppError::internal("failed to buffer upload")
            .with_source(std::io::Error::other("/tmp/.tmpAbC: No space left on device"));
        let response = err.into_response();
        assert_eq!(response.status(), 500);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: crate::envelope::FailureBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "failed to buffer upload");
    }
}
