use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "http://localhost";
pub const DEFAULT_EXTRACTOR_API: &str = "https://backend1.tioo.eu.org";
pub const DEFAULT_STRIPE_API: &str = "https://api.stripe.com";
pub const DEFAULT_EXTRACTOR_TIMEOUT_SECS: u64 = 60;

/// Placeholder Stripe replaces with the created session id on redirect.
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    Test,
    #[default]
    Development,
}

impl Environment {
    /// Anything that is not `production` or `test` runs as development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Production => "production",
            Environment::Test => "test",
            Environment::Development => "development",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSection {
    pub environment: Option<String>,
    pub port: Option<u16>,
    pub host_url_prod: Option<String>,
    pub host_url_test: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StripeSection {
    pub secret_prod_key: Option<String>,
    pub secret_test_key: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractorSection {
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSection {
    pub format: Option<String>,
}

/// On-disk TOML configuration. Every value is optional; environment
/// variables take precedence over anything set here.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub stripe: StripeSection,
    pub extractor: ExtractorSection,
    pub logging: LoggingSection,
}

impl ConfigFile {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file {}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

pub const CONFIG_DIR_NAME: &str = "grabpay";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// First `<dir>/grabpay/config.toml` that exists, in search order.
pub fn find_config_file<I>(search_dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    search_dirs
        .into_iter()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Success and cancel URLs handed to the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Fully resolved runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub port: u16,
    pub host_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub extractor_api_base: String,
    pub extractor_timeout_secs: u64,
    pub log_format: String,
}

impl Config {
    pub fn from_env(file: Option<ConfigFile>) -> Result<Self> {
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    pub fn from_sources<F>(file: Option<ConfigFile>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let environment = env("APP_ENV")
            .or(file.server.environment.clone())
            .map(|value| Environment::parse(&value))
            .unwrap_or_default();

        let port = match env("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", value))?,
            None => file.server.port.unwrap_or(DEFAULT_PORT),
        };

        let (secret_key, host_url) = if environment.is_production() {
            (
                env("STRIPE_SECRET_PROD_KEY").or(file.stripe.secret_prod_key),
                env("HOST_URL_PROD").or(file.server.host_url_prod),
            )
        } else {
            (
                env("STRIPE_SECRET_TEST_KEY").or(file.stripe.secret_test_key),
                env("HOST_URL_TEST").or(file.server.host_url_test),
            )
        };

        let host_url = host_url
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .trim_end_matches('/')
            .to_string();

        let extractor_api_base = env("EXTRACTOR_API_URL")
            .or(file.extractor.api_base)
            .unwrap_or_else(|| DEFAULT_EXTRACTOR_API.to_string());

        let log_format = env("LOG_FORMAT")
            .or(file.logging.format)
            .unwrap_or_else(|| "json".to_string());

        Ok(Self {
            environment,
            port,
            host_url,
            stripe_secret_key: secret_key,
            stripe_api_base: file
                .stripe
                .api_base
                .unwrap_or_else(|| DEFAULT_STRIPE_API.to_string()),
            extractor_api_base,
            extractor_timeout_secs: file
                .extractor
                .timeout_secs
                .unwrap_or(DEFAULT_EXTRACTOR_TIMEOUT_SECS),
            log_format,
        })
    }

    pub fn redirect_urls(&self) -> RedirectUrls {
        let base = if self.environment.is_production() {
            self.host_url.clone()
        } else {
            format!("{}:{}", self.host_url, self.port)
        };

        RedirectUrls {
            success_url: format!("{}/success?session_id={}", base, CHECKOUT_SESSION_PLACEHOLDER),
            cancel_url: format!("{}/cancel", base),
        }
    }
}
