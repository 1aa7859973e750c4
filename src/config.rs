use std::str::FromStr;

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::domain::errors::ConfigError;

const CONFIG_FILE: &str = "configuration";

#[derive(Clone, Debug)]
pub struct Config {
    pub application: ApplicationConfig,
    pub database: DatabaseConfig,
    pub telegram: TelegramConfig,
    pub referral: ReferralConfig,
}

#[derive(Clone, Debug)]
pub struct ApplicationConfig {
    pub debug_mode: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub ssl_mode: PgSslMode,
}

impl DatabaseConfig {
    pub fn get_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .database(&self.database_name)
            .ssl_mode(self.ssl_mode)
    }
}

#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub bot_token: Secret<String>,
    /// Long-poll timeout for `getUpdates`, in seconds.
    pub poll_timeout: u64,
}

#[derive(Clone, Debug)]
pub struct ReferralConfig {
    pub max_attempts: u32,
}

/// Flat view of the keys as they appear in the environment (`BOT_TOKEN`,
/// `DB_HOST`, ...) or in `configuration.yaml`.
#[derive(Deserialize)]
struct Settings {
    bot_token: Secret<String>,
    db_user: String,
    db_password: Secret<String>,
    db_host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    db_port: u16,
    db_name: String,
    #[serde(default = "default_ssl_mode")]
    db_sslmode: String,
    #[serde(default = "default_debug_mode")]
    debug_mode: String,
    #[serde(
        default = "default_poll_timeout",
        deserialize_with = "deserialize_number_from_string"
    )]
    poll_timeout: u64,
    #[serde(
        default = "default_max_attempts",
        deserialize_with = "deserialize_number_from_string"
    )]
    referral_code_max_attempts: u32,
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

fn default_debug_mode() -> String {
    "info".to_string()
}

fn default_poll_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    5
}

impl Config {
    /// Reads `configuration.yaml` (if present) and then the process
    /// environment. Call `dotenv` before this to pick up a `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::default());

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.try_into()
    }
}

impl TryFrom<Settings> for Config {
    type Error = ConfigError;

    fn try_from(settings: Settings) -> Result<Self, Self::Error> {
        let ssl_mode =
            PgSslMode::from_str(&settings.db_sslmode).map_err(|e| ConfigError::Invalid {
                key: "DB_SSLMODE",
                reason: e.to_string(),
            })?;

        if settings.referral_code_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "REFERRAL_CODE_MAX_ATTEMPTS",
                reason: "must be at least 1".to_string(),
            });
        }

        if settings.bot_token.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "BOT_TOKEN",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            application: ApplicationConfig {
                debug_mode: settings.debug_mode,
            },
            database: DatabaseConfig {
                username: settings.db_user,
                password: settings.db_password,
                host: settings.db_host,
                port: settings.db_port,
                database_name: settings.db_name,
                ssl_mode,
            },
            telegram: TelegramConfig {
                bot_token: settings.bot_token,
                poll_timeout: settings.poll_timeout,
            },
            referral: ReferralConfig {
                max_attempts: settings.referral_code_max_attempts,
            },
        })
    }
}
