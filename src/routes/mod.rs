use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

mod analytics;
pub use analytics::*;

mod auth;
pub use auth::*;

mod chat;
pub use chat::*;

mod contact;
pub use contact::*;

mod content;
pub use content::*;

mod health_check;
pub use health_check::*;

mod newsletter;
pub use newsletter::*;

mod user;
pub use user::*;

/// JSON body of every `{ "error": ... }` response.
#[derive(serde::Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Invalid email or password")]
    AuthenticationError(#[source] anyhow::Error),
    #[error("{message}")]
    UnexpectedError {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Maps any error into a 500 answered with `message`, keeping the error as source for the logs.
    pub fn unexpected<E>(message: &'static str) -> impl FnOnce(E) -> ApiError
    where
        E: Into<anyhow::Error>,
    {
        move |err| ApiError::UnexpectedError {
            message,
            source: err.into(),
        }
    }
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            ApiError::UnexpectedError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: &self.to_string(),
        })
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
