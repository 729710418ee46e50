use config::{Config, ConfigError, File};
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time;

#[derive(Debug)]
pub enum Environment {
    Development,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub cosmic: CosmicSettings,
    pub newsletter: NewsletterSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct CosmicSettings {
    pub base_url: String,
    pub bucket_slug: String,
    // secrecy protects secret information and prevents them to be exposed (eg: via logs)
    pub read_key: Secret<String>,
    pub write_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct NewsletterSettings {
    // Optional endpoint notified about every successful subscription
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub session_secret: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub session_ttl_hours: i64,
}

impl Settings {
    pub fn get_address(&self) -> String {
        format!(
            "{}:{}",
            self.application.get_host(),
            self.application.get_port()
        )
    }

    pub fn set_app_port(&mut self, port: u16) {
        self.application.port = port;
    }

    pub fn set_cosmic_base_url(&mut self, new_base_url: String) {
        self.cosmic.set_base_url(new_base_url)
    }

    pub fn set_newsletter_webhook_url(&mut self, webhook_url: Option<String>) {
        self.newsletter.webhook_url = webhook_url
    }
}

impl ApplicationSettings {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_host(&self) -> String {
        self.host.clone()
    }
}

impl CosmicSettings {
    pub fn get_base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn get_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn set_base_url(&mut self, new_base_url: String) {
        self.base_url = new_base_url
    }
}

impl NewsletterSettings {
    pub fn get_timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_milliseconds)
    }
}

impl AuthSettings {
    pub fn get_session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            unknown_env => Err(format!(
                "{} is not supported environment. Use either 'development' or 'production'.",
                unknown_env
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let root_path = std::env::current_dir().map_err(|err| {
        ConfigError::Message(format!("Failed to determine the current directory: {}", err))
    })?;
    let config_directory = root_path.join("config");
    // Uses development environment by default
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let config_base_filepath = config_directory.join("base");
    let config_env_filepath = config_directory.join(environment.as_str());

    // It merges the base configuration file with the one from the specific environment (development or production)
    let settings = Config::builder()
        .add_source(File::from(config_base_filepath).required(true))
        .add_source(File::from(config_env_filepath).required(true))
        // Merge settings from environment variables with a prefix of APP and "__" separator
        // E.g APP_COSMIC__WRITE_KEY would set Settings.cosmic.write_key
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?;

    tracing::info!("Application environment = {:?}", environment);

    // Try to convert the value from the configuration file into a Settings type
    settings.try_deserialize()
}
