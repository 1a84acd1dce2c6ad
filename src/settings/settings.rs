use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    pub jwt: Jwt,
    pub cache: Cache,
    pub store: Store,
    #[serde(default)]
    pub worker: Worker,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Deserialize)]
pub struct Jwt {
    pub issuer: String,
    pub secret: Option<String>, // falls back to $JWT_SECRET
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
}

impl std::fmt::Debug for Jwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwt")
            .field("issuer", &self.issuer)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

impl Jwt {
    pub fn signing_key(&self) -> Result<Vec<u8>> {
        let secret = match &self.secret {
            Some(secret) => secret.clone(),
            None => std::env::var("JWT_SECRET").map_err(|_| anyhow!("JWT secret is not set"))?,
        };
        if secret.is_empty() {
            return Err(anyhow!("JWT secret is empty"));
        }
        Ok(secret.into_bytes())
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_secs)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    pub backend: String, // "redis" or "memory"
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "mysql" or "memory"
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Worker {
    #[serde(default = "default_worker_address")]
    pub address: String,
    #[serde(default = "default_user_count_interval_secs")]
    pub user_count_interval_secs: u64,
}

impl Default for Worker {
    fn default() -> Self {
        Worker {
            address: default_worker_address(),
            user_count_interval_secs: default_user_count_interval_secs(),
        }
    }
}

impl Worker {
    fn validate(&self) -> Result<()> {
        if self.user_count_interval_secs == 0 {
            return Err(anyhow!("worker.user_count_interval_secs must be at least 1"));
        }
        Ok(())
    }
}

fn default_access_ttl_secs() -> u64 {
    15 * 60
}

fn default_refresh_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_worker_address() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_user_count_interval_secs() -> u64 {
    10
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Loads the TOML file, then `USERGATE__SECTION__KEY` environment overrides.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("USERGATE").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;
    settings.worker.validate()?;

    Ok(settings)
}
