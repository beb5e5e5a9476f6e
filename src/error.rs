use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

pub const TASK_NOT_FOUND: &str = "Task not found or you don't have permission";

/// Every failure a handler can surface to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UserNotFound(String),

    #[error("{}", TASK_NOT_FOUND)]
    TaskNotFound,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Access Denied")]
    Authentication,

    #[error("Invalid Token")]
    InvalidToken,

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::UserNotFound(_)
            | AppError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            AppError::TaskNotFound => StatusCode::NOT_FOUND,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unwraps a JSON body extracted as `Result<Json<T>, JsonRejection>`.
///
/// A body sent without a JSON content type (including no body at all) reads as
/// an empty object, so its fields come out missing. A body that is not valid
/// JSON or does not fit `T` is a validation failure.
pub fn json_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(e) => {
            warn!(error = %e, "rejected request body");
            Err(AppError::Validation("Invalid request body".into()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Store(e) => {
                error!(error = %e, "store failure");
                "Server error".to_string()
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal failure");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{header, Request},
    };
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        name: Option<String>,
    }

    async fn extract(req: Request<Body>) -> AppResult<Sample> {
        json_body(Json::<Sample>::from_request(req, &()).await)
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn body_without_json_content_type_reads_as_empty() {
        let req = Request::post("/").body(Body::empty()).unwrap();
        assert!(extract(req).await.unwrap().name.is_none());
    }

    #[tokio::test]
    async fn malformed_or_mistyped_body_is_a_validation_error() {
        for body in ["{not json", r#"{"name": 5}"#] {
            let err = extract(json_request(body)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{body}");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        let ok = extract(json_request(r#"{"name": "alice"}"#)).await.unwrap();
        assert_eq!(ok.name.as_deref(), Some("alice"));
    }

    #[test]
    fn client_errors_map_to_expected_statuses() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UserNotFound("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::TaskNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn server_errors_hide_detail() {
        let err = AppError::Internal(anyhow::anyhow!("argon2 exploded"));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_error_is_500() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
