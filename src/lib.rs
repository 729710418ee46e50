pub mod authentication;
pub mod config;
pub mod cosmic_client;
pub mod domain;
pub mod keyed_lock;
pub mod record_store;
pub mod routes;
pub mod startup;
pub mod subscription_manager;
pub mod telemetry;
pub mod users;
pub mod webhook_client;
