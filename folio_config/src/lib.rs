use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use folio_models::email_address::EmailAddressWithName;
use serde::Deserialize;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_VAR: &str = "FOLIO_CONFIG";

const ENV_PREFIX: &str = "FOLIO";
const ENV_SEPARATOR: &str = "__";

/// Load the config from the default file, the files listed in `FOLIO_CONFIG`
/// and `FOLIO__*` environment variables, in that order.
pub fn load() -> anyhow::Result<Config> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
    if let Some(extra) = std::env::var_os(CONFIG_PATHS_VAR) {
        paths.extend(std::env::split_paths(&extra));
    }

    load_from(&paths, &[], environment())
}

/// Load the config from `paths`, then apply `overrides` (TOML snippets like
/// `"rate_limit.max_requests = 5"`). The environment is ignored.
pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    load_from(paths, overrides, environment().source(Some(Default::default())))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn load_from(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
    environment: Environment,
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    overrides
        .iter()
        .fold(builder, |builder, &snippet| {
            builder.add_source(File::from_str(snippet, FileFormat::Toml))
        })
        .add_source(environment)
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub rate_limit: RateLimitConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub real_ip: Option<RealIpConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: Option<IpAddr>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    /// Without an SMTP server contact messages are only logged.
    pub smtp_url: Option<String>,
    pub from: EmailAddressWithName,
    #[serde(default = "default_email_timeout")]
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub email: EmailAddressWithName,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_window")]
    pub window: Duration,
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_rate_limit_sweep_interval")]
    pub sweep_interval: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: String,
}

fn default_email_timeout() -> Duration {
    Duration(std::time::Duration::from_secs(10))
}

fn default_rate_limit_window() -> Duration {
    Duration(std::time::Duration::from_secs(60 * 60))
}

fn default_rate_limit_max_requests() -> u32 {
    3
}

fn default_rate_limit_sweep_interval() -> Duration {
    Duration(std::time::Duration::from_secs(10 * 60))
}
