use crate::models::Credentials;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://soawebservices.com.br";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Service environment, used as a path segment in every endpoint URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Ambiente {
    #[serde(rename = "producao")]
    Producao,
    /// Sandbox that answers with canned data.
    #[default]
    #[serde(rename = "test-drive")]
    TestDrive,
}

impl Ambiente {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ambiente::Producao => "producao",
            Ambiente::TestDrive => "test-drive",
        }
    }
}

impl fmt::Display for Ambiente {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ambiente {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "producao" | "produção" => Ok(Ambiente::Producao),
            "test-drive" | "testdrive" => Ok(Ambiente::TestDrive),
            other => anyhow::bail!("SOA_AMBIENTE must be 'producao' or 'test-drive', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub ambiente: Ambiente,
    pub credentials: Credentials,
    /// Socket-level timeout of the HTTP client, independent of call deadlines.
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable source.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            base_url: var("SOA_BASE_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim()
                .trim_end_matches('/')
                .to_string(),
            ambiente: var("SOA_AMBIENTE")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<Ambiente>())
                .transpose()?
                .unwrap_or_default(),
            credentials: Credentials {
                email: var("SOA_EMAIL")
                    .ok_or_else(|| anyhow::anyhow!("SOA_EMAIL environment variable required"))
                    .and_then(|email| {
                        if email.trim().is_empty() {
                            anyhow::bail!("SOA_EMAIL cannot be empty");
                        }
                        Ok(email)
                    })?,
                senha: var("SOA_SENHA")
                    .ok_or_else(|| anyhow::anyhow!("SOA_SENHA environment variable required"))
                    .and_then(|senha| {
                        if senha.trim().is_empty() {
                            anyhow::bail!("SOA_SENHA cannot be empty");
                        }
                        Ok(senha)
                    })?,
            },
            timeout_secs: var("SOA_TIMEOUT_SECS")
                .map(|s| s.trim().parse::<u64>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("SOA_TIMEOUT_SECS must be a whole number of seconds"))?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        config.validate()?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("SOA Base URL: {}", config.base_url);
        tracing::debug!("SOA Ambiente: {}", config.ambiente);
        tracing::debug!("SOA account: {}", config.credentials.email);

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("SOA_BASE_URL is not a valid URL: {}", e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("SOA_BASE_URL must start with http:// or https://");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("SOA_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
