mod password;
mod session;

pub use password::{compute_password_hash, validate_credentials, AuthError, Credentials};
pub use session::{AuthenticatedUser, SessionError, SessionKeys};
