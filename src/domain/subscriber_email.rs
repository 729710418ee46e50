/// Email address of a newsletter subscriber.
///
/// Only a minimal syntactic check is made: the address must be non-empty and contain an `@`.
/// It is stored exactly as submitted, no case or whitespace normalization happens.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        if email.is_empty() || !email.contains('@') {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
