use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, Secret};

use crate::domain::user::User;
use crate::record_store::RecordStore;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::users::find_user_by_email;

// Verified when the email is unknown, so that both failure paths take the same time
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Validate credentials", skip(store, credentials))]
pub async fn validate_credentials<S: RecordStore>(
    store: &S,
    credentials: Credentials,
) -> Result<User, AuthError> {
    let user = find_user_by_email(store, &credentials.email)
        .await
        .context("Failed to retrieve the user from the content backend.")?;
    let expected_password_hash = user
        .as_ref()
        .map(|user| user.password_hash.clone())
        .unwrap_or_else(|| Secret::new(DUMMY_PASSWORD_HASH.to_string()));

    spawn_blocking_with_tracing(move || {
        verify_password_hash(expected_password_hash, credentials.password)
    })
    .await
    .context("Failed to spawn blocking task.")??;

    user.ok_or_else(|| anyhow::anyhow!("Unknown email."))
        .map_err(AuthError::InvalidCredentials)
}

#[tracing::instrument(name = "Verify password hash", skip(expected_password_hash, password_candidate))]
fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .context("Invalid password.")
        .map_err(AuthError::InvalidCredentials)
}

/// Hashes a password with Argon2id. CPU bound: run it with `spawn_blocking_with_tracing`.
pub fn compute_password_hash(password: Secret<String>) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let params = Params::new(15000, 2, 1, None).context("Invalid Argon2 parameters.")?;
    let password_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .context("Failed to hash password.")?
        .to_string();

    Ok(Secret::new(password_hash))
}
