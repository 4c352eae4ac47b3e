//! Application settings.
//!
//! Read from an optional TOML file (`settings.toml` unless `--config` says
//! otherwise) and overridden by `WAYLO_*` environment variables, where `__`
//! separates nested keys: `WAYLO_SERVER__PORT=8080`.

use std::collections::BTreeMap;

use clap::Parser;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use engine::{CurrencyCode, RateTable};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "waylo", about = "Waylo trip planner backend")]
struct Args {
    /// Settings file, with or without the `.toml` extension.
    #[arg(long, env = "WAYLO_CONFIG")]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub cors_origin: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            database: Database::Memory,
            cors_origin: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl: String,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl: String,
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_access_ttl() -> String {
    "15m".to_string()
}

fn default_refresh_ttl() -> String {
    "7d".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub reference: String,
    pub rates: BTreeMap<String, f64>,
}

impl Default for Currency {
    fn default() -> Self {
        let table = RateTable::default();
        Self {
            reference: table.reference().to_string(),
            rates: table
                .codes()
                .map(|code| (code.to_string(), table.rate(code)))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    pub auth: Auth,
    #[serde(default)]
    pub currency: Currency,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("WAYLO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        if settings.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret is empty".to_string()));
        }
        // Fail at startup rather than on the first login.
        settings.auth_config()?;
        settings.rate_table()?;
        Ok(settings)
    }

    pub fn auth_config(&self) -> Result<server::AuthConfig, ConfigError> {
        Ok(server::AuthConfig {
            jwt_secret: self.auth.jwt_secret.clone(),
            access_token_ttl: parse_duration(&self.auth.access_token_ttl)?,
            refresh_token_ttl: parse_duration(&self.auth.refresh_token_ttl)?,
            secure_cookies: self.auth.secure_cookies,
        })
    }

    pub fn rate_table(&self) -> Result<RateTable, ConfigError> {
        let invalid = |err: engine::EngineError| ConfigError::Message(format!("currency: {err}"));
        let reference = CurrencyCode::new(&self.currency.reference).map_err(invalid)?;
        let mut table = RateTable::new(reference);
        for (code, rate) in &self.currency.rates {
            table = table.with_rate(code, *rate).map_err(invalid)?;
        }
        Ok(table)
    }

    pub fn server_config(&self) -> server::ServerConfig {
        server::ServerConfig {
            cors_origin: self.server.cors_origin.clone(),
        }
    }
}

/// Parse `<n><unit>` with unit `s`, `m`, `h` or `d`.
fn parse_duration(value: &str) -> Result<chrono::Duration, ConfigError> {
    let invalid = || ConfigError::Message(format!("invalid duration: {value:?}"));
    let value = value.trim();
    let split = value.len().checked_sub(1).ok_or_else(invalid)?;
    let (amount, unit) = value.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }
    let duration = match unit {
        "s" => chrono::Duration::try_seconds(amount),
        "m" => chrono::Duration::try_minutes(amount),
        "h" => chrono::Duration::try_hours(amount),
        "d" => chrono::Duration::try_days(amount),
        _ => None,
    };
    duration.ok_or_else(invalid)
}
