use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A 422 as seen from the client side, keeping the server's per-field
    /// error messages intact.
    #[error("Unprocessable: {message}")]
    Unprocessable {
        message: String,
        errors: std::collections::HashMap<String, Vec<String>>,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, message, field_errors) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            Error::Validation(errs) => {
                let fields: serde_json::Map<String, serde_json::Value> = errs
                    .field_errors()
                    .iter()
                    .map(|(field, errors)| {
                        let messages: Vec<String> = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        (field.to_string(), json!(messages))
                    })
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The given data was invalid.".to_string(),
                    Some(serde_json::Value::Object(fields)),
                )
            }
            Error::Unprocessable { message, errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                message,
                Some(json!(errors)),
            ),
            Error::Multipart(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Http(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
                None,
            ),
            Error::Config(msg) | Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
        };

        let mut body = json!({ "success": false, "message": message });
        if let Some(errors) = field_errors {
            body["errors"] = errors;
        }
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
