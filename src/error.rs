use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::error;

/// Crate-wide error taxonomy. Services raise `NotFound`/`Duplicate`,
/// request validation raises `Validation`, everything store-level
/// surfaces as an opaque internal failure at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} already exists with this {field}")]
    Duplicate {
        resource: &'static str,
        field: &'static str,
    },

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn duplicate(resource: &'static str, field: &'static str) -> Self {
        Error::Duplicate { resource, field }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Duplicate { .. } => StatusCode::CONFLICT,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Database(_) | Error::Mongo(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Error::Database(_) | Error::Mongo(_) | Error::Internal(_) => {
                error!(error = %self, "Request failed with internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
