use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// How request bodies are encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyEncoding {
    #[default]
    Json,
    FormUrlEncoded,
}

/// Runtime configuration for the form client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend, without trailing slash.
    pub server: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub encoding: BodyEncoding,
    /// Number of load inputs on a freshly created form.
    pub load_slots: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
            encoding: BodyEncoding::Json,
            load_slots: 0,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, FormError> {
        toml::from_str(text).map_err(|e| FormError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FormError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `LOADFORM_SERVER` and `LOADFORM_TIMEOUT_SECS` overrides.
    pub fn with_env(self) -> Result<Self, FormError> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, FormError> {
        if let Some(server) = var("LOADFORM_SERVER") {
            self.server = server;
        }
        if let Some(timeout) = var("LOADFORM_TIMEOUT_SECS") {
            self.timeout_secs = timeout
                .parse()
                .map_err(|_| FormError::Config(format!("invalid LOADFORM_TIMEOUT_SECS: {timeout}")))?;
        }
        Ok(self)
    }
}
