use secrecy::{ExposeSecret, Secret};

const MIN_CHAR_LENGTH: usize = 8;

/// A password chosen at signup, kept out of logs.
#[derive(Debug)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(password: Secret<String>) -> Result<Password, String> {
        if password.expose_secret().chars().count() < MIN_CHAR_LENGTH {
            return Err(format!(
                "Password must be at least {} characters",
                MIN_CHAR_LENGTH
            ));
        }

        Ok(Self(password))
    }

    pub fn as_secret(&self) -> &Secret<String> {
        &self.0
    }
}
