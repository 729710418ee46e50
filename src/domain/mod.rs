pub mod analytics_event;
pub mod bookmarks;
pub mod chat_message;
pub mod contact_submission;
pub mod content;
pub mod email_address;
pub mod new_subscriber;
pub mod password;
pub mod subscriber;
pub mod subscriber_email;
pub mod subscriber_status;
pub mod user;
pub mod user_name;
