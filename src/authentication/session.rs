use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use std::future::{ready, Ready};

use crate::config::AuthSettings;
use crate::routes::ErrorBody;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies stateless session tokens of the form
/// `{user_id}.{expires_at}.{signature}`, where `expires_at` is a unix timestamp and
/// `signature` the hex encoded HMAC-SHA256 of `{user_id}.{expires_at}`.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Secret<String>,
    ttl: Duration,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("Missing session token.")]
    MissingToken,
    #[error("Malformed session token.")]
    MalformedToken,
    #[error("Invalid session token signature.")]
    InvalidSignature,
    #[error("Expired session token.")]
    Expired,
    #[error("Session keys are not configured.")]
    MissingKeys,
    #[error("Invalid session secret.")]
    InvalidSecret,
}

impl SessionKeys {
    pub fn new(secret: Secret<String>, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.session_secret.clone(), settings.get_session_ttl())
    }

    pub fn issue(&self, user_id: &str) -> Result<String, SessionError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        let payload = format!("{}.{}", user_id, (now + self.ttl).timestamp());
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Returns the user id the token was issued for.
    pub fn verify(&self, token: &str) -> Result<String, SessionError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        let (payload, signature) = token
            .rsplit_once('.')
            .ok_or(SessionError::MalformedToken)?;
        let (user_id, expires_at) = payload
            .rsplit_once('.')
            .ok_or(SessionError::MalformedToken)?;
        let signature = hex::decode(signature).map_err(|_| SessionError::MalformedToken)?;

        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| SessionError::InvalidSignature)?;

        let expires_at: i64 = expires_at
            .parse()
            .map_err(|_| SessionError::MalformedToken)?;

        if user_id.is_empty() {
            return Err(SessionError::MalformedToken);
        }

        if now.timestamp() >= expires_at {
            return Err(SessionError::Expired);
        }

        Ok(user_id.to_string())
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, SessionError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| SessionError::InvalidSecret)?;

        mac.update(payload.as_bytes());
        Ok(mac)
    }
}

/// A request carrying a valid `Authorization: Bearer <session token>` header.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = SessionError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}

fn authenticate_request(req: &HttpRequest) -> Result<AuthenticatedUser, SessionError> {
    let session_keys = req
        .app_data::<web::Data<SessionKeys>>()
        .ok_or(SessionError::MissingKeys)?;
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(SessionError::MissingToken)?;

    let user_id = session_keys.verify(token)?;

    Ok(AuthenticatedUser { user_id })
}

impl ResponseError for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::MissingKeys | SessionError::InvalidSecret => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self.status_code() {
            StatusCode::UNAUTHORIZED => "Unauthorized",
            _ => "Internal server error",
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}
