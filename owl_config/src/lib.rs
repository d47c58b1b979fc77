use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context};
use config::{File, FileFormat};
use owl_models::{email_address::EmailAddress, Sensitive};
use serde::Deserialize;

pub use self::{duration::Duration, flag::Flag};

mod duration;
mod flag;

/// Built-in defaults, overridden by config files and the environment.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATH_ENV: &str = "OWL_CONFIG_PATH";

/// Sender used when neither `smtp.from` nor `smtp.user` is set.
pub const DEFAULT_SENDER: &str = "no-reply@theowl.solutions";

/// Environment variables and the config keys they override.
pub const ENV_OVERRIDES: [(&str, &str); 10] = [
    ("OWL_HTTP_ADDRESS", "http.address"),
    ("OWL_PAGES_DIR", "http.pages_dir"),
    ("OWL_STATIC_DIR", "http.static_dir"),
    ("OWL_LEAD_TO", "lead.recipient"),
    ("SMTP_HOST", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_USER", "smtp.user"),
    ("SMTP_PASSWORD", "smtp.password"),
    ("SMTP_FROM", "smtp.from"),
    ("SMTP_STARTTLS", "smtp.starttls"),
];

/// Variable overriding `smtp.timeout`.
const SMTP_TIMEOUT_ENV: &str = "SMTP_TIMEOUT";

/// Load the configuration of the current process.
///
/// A `.env` file in the working directory (or any parent) is loaded into
/// the environment first, without replacing variables that are already set.
pub fn load() -> anyhow::Result<Config> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("Failed to load .env file");
        }
    }

    let paths = std::env::var_os(CONFIG_PATH_ENV)
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();

    load_from(&paths, |key| std::env::var(key).ok())
}

/// Load the configuration from the defaults, the given files and the
/// variables returned by `env`.
pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })?;

    let builder = ENV_OVERRIDES
        .into_iter()
        .chain([(SMTP_TIMEOUT_ENV, "smtp.timeout")])
        .try_fold(builder, |builder, (var, key)| {
            builder
                .set_override_option(key, env(var))
                .with_context(|| format!("Failed to apply {var}"))
        })?;

    let config: Config = builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")?;

    ensure!(
        !config.smtp.timeout.is_zero(),
        "smtp.timeout must be greater than zero"
    );

    Ok(config)
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub smtp: SmtpConfig,
    pub lead: LeadConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
    pub pages_dir: PathBuf,
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Sensitive<String>,
    pub from: Option<String>,
    pub starttls: Flag,
    pub timeout: Duration,
}

impl SmtpConfig {
    /// The address used in the `From` header.
    pub fn sender(&self) -> &str {
        let from = self.from.as_deref().unwrap_or(&self.user);
        if from.is_empty() {
            DEFAULT_SENDER
        } else {
            from
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeadConfig {
    pub recipient: EmailAddress,
}
