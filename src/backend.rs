use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::{BodyEncoding, Config};
use crate::error::FormError;
use crate::payload::{form_pairs, ApiResponse};

pub mod endpoints {
    pub const LOAD_DIRECTORY: &str = "/config/load-directory";
    pub const LOAD_CONFIG: &str = "/config/load-config";
    pub const SAVE_CONFIG: &str = "/config/save-config";
    pub const UPDATE_METRIC_TYPE: &str = "/config/update-metric-type";
    pub const UPDATE_USE_CUSTOM_LOADS: &str = "/config/update-use-custom-loads";
    pub const CLEAR_SESSION: &str = "/config/clear-session";
    pub const GENERATE_GRAPHS: &str = "/generation/generate-graphs";
    pub const EXPORT_RESULTS: &str = "/generation/export-results";
}

/// Request/response boundary to the backend. One call is one POST.
pub trait Backend {
    /// POST `body` (or nothing) to `path` and parse the reply.
    fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, FormError>;
}

/// Blocking HTTP backend.
pub struct HttpBackend {
    http: Client,
    base_url: String,
    encoding: BodyEncoding,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, FormError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.server.trim_end_matches('/').to_string(),
            encoding: config.encoding,
        })
    }
}

impl Backend for HttpBackend {
    fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, FormError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = match self.encoding {
                BodyEncoding::Json => request.json(body),
                BodyEncoding::FormUrlEncoded => request.form(&form_pairs(body)),
            };
        }

        tracing::debug!(%url, encoding = ?self.encoding, "posting form");
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        tracing::debug!(%url, status = status.as_u16(), "backend replied");

        let parsed = ApiResponse::from_body(&text)?;
        if !status.is_success() && parsed.error.is_none() {
            return Err(FormError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        Ok(parsed)
    }
}
