//! Request and response bodies exchanged with the backend.

use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::FormError;
use crate::load_filter::EncodedLoads;

/// `graph-config` object carrying the encoded load slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default, deserialize_with = "scalar_strings")]
    pub loads: Vec<String>,
    #[serde(
        rename = "load-filter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub load_filter: Option<String>,
}

impl From<EncodedLoads> for GraphConfig {
    fn from(enc: EncodedLoads) -> Self {
        Self {
            loads: enc.loads,
            load_filter: enc.filter,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadDirectoryRequest {
    #[serde(rename = "base-directory")]
    pub base_directory: String,
    #[serde(rename = "metric-type")]
    pub metric_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadConfigRequest {
    #[serde(rename = "input-config")]
    pub input_config: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SaveConfigRequest {
    pub output_config: String,
    pub directory_list: Vec<String>,
    pub labels: Vec<String>,
    pub grouped_metrics: BTreeMap<String, Vec<String>>,
    pub graph_config: GraphConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricTypeRequest {
    #[serde(rename = "metric-type")]
    pub metric_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomLoadsRequest {
    #[serde(rename = "use-custom-loads")]
    pub use_custom_loads: bool,
}

/// Body of `/generation/generate-graphs`. Values are sent as the raw text of
/// their inputs; the backend does the parsing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GenerateGraphsRequest {
    pub directory_list: Vec<String>,
    pub labels: Vec<String>,
    pub grouped_metrics: BTreeMap<String, Vec<String>>,
    pub graph_type: String,
    pub language: String,
    pub overwrite: String,
    pub use_grid: String,
    pub ylim_low: String,
    pub ylim_up: String,
    pub x_axis_direction: String,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub figure_width: String,
    pub figure_height: String,
    pub graph_font_size: String,
    pub legend_font_size: String,
    pub legend_position: String,
    pub anchor_x: String,
    pub anchor_y: String,
    pub frameon: String,
    pub max_columns: String,
    pub loads: BTreeMap<String, String>,
    pub load_points_filter: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportResultsRequest {
    pub directory_list: Vec<String>,
    pub labels: Vec<String>,
    pub grouped_metrics: BTreeMap<String, Vec<String>>,
    pub overwrite: String,
    pub loads: BTreeMap<String, String>,
    pub load_points_filter: String,
}

/// Saved configuration echoed back by `/config/load-config`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigData {
    /// Directory value to label.
    #[serde(default)]
    pub directories: Option<BTreeMap<String, String>>,
    /// Metric group id to selected metrics.
    #[serde(default)]
    pub metrics: Option<BTreeMap<String, Vec<String>>>,
    #[serde(rename = "graph-config", default)]
    pub graph_config: Option<GraphConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub config_data: Option<ConfigData>,
}

impl ApiResponse {
    /// Parse a response body.
    ///
    /// Some endpoints answer with plain text; that text becomes the message.
    /// In a JSON object `error` and `message` are read as text whatever their
    /// JSON type. A `config_data` that does not fit [`ConfigData`] is an error.
    pub fn from_body(body: &str) -> Result<Self, FormError> {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Ok(Self::text(body.trim()));
        };
        let mut map = match value {
            Value::Object(map) => map,
            Value::String(s) => return Ok(Self::text(&s)),
            other => return Ok(serde_json::from_value(other)?),
        };

        let config_data = match map.remove("config_data") {
            None | Some(Value::Null) => None,
            Some(data) => Some(serde_json::from_value(data)?),
        };
        Ok(ApiResponse {
            error: map.remove("error").and_then(loose_text),
            message: map.remove("message").and_then(loose_text),
            config_data,
        })
    }

    fn text(text: &str) -> Self {
        ApiResponse {
            message: (!text.is_empty()).then(|| text.to_string()),
            ..ApiResponse::default()
        }
    }
}

fn loose_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Load values may be saved as JSON numbers; read every scalar as its text.
fn scalar_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    items
        .iter()
        .map(|item| match item {
            Value::Array(_) | Value::Object(_) => Err(<D::Error as de::Error>::custom(format!(
                "load value must be a string or number, got {item}"
            ))),
            other => Ok(scalar_text(other)),
        })
        .collect()
}

/// Flatten a JSON object into URL-encoded form pairs.
///
/// Arrays become repeated keys, nested objects their JSON text, `null` is
/// dropped.
pub fn form_pairs(body: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let Value::Object(map) = body else {
        return pairs;
    };
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
