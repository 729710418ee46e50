mod analytics;
mod chat;
mod health_check;
mod newsletter;
