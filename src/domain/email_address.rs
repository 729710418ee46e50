use validator::validate_email;

/// Fully validated email address, used for contact requests and user accounts.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(email: String) -> Result<EmailAddress, String> {
        if !validate_email(&email) {
            return Err(String::from("Invalid email address"));
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
