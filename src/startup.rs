use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::authentication::SessionKeys;
use crate::config::Settings;
use crate::cosmic_client::CosmicClient;
use crate::keyed_lock::KeyedLocks;
use crate::routes::{
    handle_add_bookmark, handle_analytics_stats, handle_chat_message, handle_contact,
    handle_get_bookmarks, handle_get_profile, handle_list_content, handle_login,
    handle_remove_bookmark, handle_signup, handle_subscribe, handle_track_event,
    handle_unsubscribe, handle_update_profile, health_check, newsletter_json_config,
};
use crate::subscription_manager::SubscriptionManager;
use crate::webhook_client::WebhookClient;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let cosmic_client = CosmicClient::from_settings(&config.cosmic)
            .context("Failed to build the content backend client.")?;
        let webhook_client = WebhookClient::from_settings(&config.newsletter)
            .context("Failed to build the newsletter webhook client.")?;
        let session_keys = SessionKeys::from_settings(&config.auth);

        let listener = TcpListener::bind(config.get_address())
            .with_context(|| format!("Failed to bind {}.", config.get_address()))?;
        let port = listener.local_addr()?.port();
        let server = run(listener, cosmic_client, webhook_client, session_keys)?;

        tracing::info!("Server listening on port {}", port);

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    cosmic_client: CosmicClient,
    webhook_client: WebhookClient,
    session_keys: SessionKeys,
) -> Result<Server, std::io::Error> {
    let subscription_manager = web::Data::new(SubscriptionManager::new(cosmic_client.clone()));
    let cosmic_client = web::Data::new(cosmic_client);
    let webhook_client = web::Data::new(webhook_client);
    let session_keys = web::Data::new(session_keys);
    let locks = web::Data::new(KeyedLocks::new());

    let server = HttpServer::new(move || {
        App::new()
            // Gives every request a span carrying a request id
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/newsletter")
                            .app_data(newsletter_json_config())
                            .route("/subscribe", web::post().to(handle_subscribe))
                            .route("/unsubscribe", web::post().to(handle_unsubscribe)),
                    )
                    .route("/contact", web::post().to(handle_contact))
                    .route("/chat", web::post().to(handle_chat_message))
                    .route("/analytics/track", web::post().to(handle_track_event))
                    .route("/analytics/stats", web::get().to(handle_analytics_stats))
                    .route("/auth/signup", web::post().to(handle_signup))
                    .route("/auth/login", web::post().to(handle_login))
                    .route("/user/profile", web::get().to(handle_get_profile))
                    .route("/user/profile", web::patch().to(handle_update_profile))
                    .route("/user/bookmarks", web::get().to(handle_get_bookmarks))
                    .route("/user/bookmarks", web::post().to(handle_add_bookmark))
                    .route("/user/bookmarks", web::delete().to(handle_remove_bookmark))
                    .route("/content/{kind}", web::get().to(handle_list_content)),
            )
            .app_data(subscription_manager.clone())
            .app_data(cosmic_client.clone())
            .app_data(webhook_client.clone())
            .app_data(session_keys.clone())
            .app_data(locks.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
