//! Form operations: read the form, call one endpoint, reflect the reply.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::backend::{endpoints, Backend};
use crate::error::FormError;
use crate::form::FormContext;
use crate::load_filter::{decode_loads, encode_loads, parse_load_points};
use crate::notify::{Notifier, Severity, Toast};
use crate::payload::{
    ApiResponse, ConfigData, CustomLoadsRequest, ExportResultsRequest, GenerateGraphsRequest,
    LoadConfigRequest, LoadDirectoryRequest, MetricTypeRequest, SaveConfigRequest,
};

pub const CLEAR_SESSION_PROMPT: &str =
    "Are you sure you want to clear the session? This will remove all saved data.";

/// Result of running one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Reply applied to the form.
    Applied,
    /// Backend state changed; the page should be rebuilt from the server.
    Reload,
    /// Backend or local validation refused the request.
    Rejected(String),
    /// Nothing was sent.
    Unchanged,
}

/// Runs form actions against a backend, reporting through a notifier.
pub struct FormClient<B, N> {
    backend: B,
    notifier: N,
}

impl<B: Backend, N: Notifier> FormClient<B, N> {
    pub fn new(backend: B, notifier: N) -> Self {
        Self { backend, notifier }
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, FormError> {
        let body = serde_json::to_value(body)?;
        tracing::info!(path, "submitting form");
        self.backend.post(path, Some(&body))
    }

    fn reject(&self, toast: Toast, prefix: &str, error: String) -> Outcome {
        self.notifier
            .show(toast, &format!("{prefix}{error}"), Severity::Warning);
        Outcome::Rejected(error)
    }

    /// Point the backend at a new base directory of simulations.
    pub fn load_directory(&self, form: &FormContext) -> Result<Outcome, FormError> {
        let body = LoadDirectoryRequest {
            base_directory: form.field("base-directory")?.to_string(),
            metric_type: form
                .radio_value("metric-type")
                .unwrap_or("individual")
                .to_string(),
        };
        let resp = self.post(endpoints::LOAD_DIRECTORY, &body)?;
        if let Some(error) = resp.error {
            return Ok(self.reject(Toast::Session, "Error: ", error));
        }
        Ok(Outcome::Reload)
    }

    pub fn load_config(&self, form: &mut FormContext) -> Result<Outcome, FormError> {
        let body = LoadConfigRequest {
            input_config: form.field("input-config")?.to_string(),
        };
        let resp = self.post(endpoints::LOAD_CONFIG, &body)?;
        if let Some(error) = resp.error {
            return Ok(self.reject(Toast::InputConfig, "Error: ", error));
        }

        apply_config_data(form, &resp.config_data.unwrap_or_default());
        let message = resp
            .message
            .unwrap_or_else(|| "Configuration loaded successfully!".to_string());
        self.notifier
            .show(Toast::InputConfig, &message, Severity::Success);
        Ok(Outcome::Applied)
    }

    pub fn save_config(&self, form: &FormContext) -> Result<Outcome, FormError> {
        let body = SaveConfigRequest {
            output_config: form.field("output-config")?.to_string(),
            directory_list: form.checked_directories(),
            labels: form.directory_labels(),
            grouped_metrics: form.grouped_metrics(),
            graph_config: encode_loads(&form.loads).into(),
        };
        let resp = self.post(endpoints::SAVE_CONFIG, &body)?;
        if let Some(error) = resp.error {
            return Ok(self.reject(Toast::OutputConfig, "Error: ", error));
        }
        if let Some(message) = resp.message {
            self.notifier
                .show(Toast::OutputConfig, &message, Severity::Success);
        }
        Ok(Outcome::Applied)
    }

    /// Send the selected metric type if it differs from the one the page was
    /// rendered with.
    pub fn update_metric_type(&self, form: &mut FormContext) -> Result<Outcome, FormError> {
        let previous = form.field_or_empty("previous-metric-type");
        let Some(current) = form.radio_value("metric-type") else {
            return Ok(Outcome::Unchanged);
        };
        if previous == current {
            return Ok(Outcome::Unchanged);
        }

        let current = current.to_string();
        let body = MetricTypeRequest {
            metric_type: current.clone(),
        };
        let resp = self.post(endpoints::UPDATE_METRIC_TYPE, &body)?;
        if let Some(error) = resp.error {
            return Ok(self.reject(Toast::Session, "", error));
        }
        form.set_field("previous-metric-type", current);
        Ok(Outcome::Reload)
    }

    pub fn update_use_custom_loads(&self, form: &FormContext) -> Result<Outcome, FormError> {
        let body = CustomLoadsRequest {
            use_custom_loads: form.toggle("use-custom-loads"),
        };
        let resp = self.post(endpoints::UPDATE_USE_CUSTOM_LOADS, &body)?;
        if let Some(error) = resp.error {
            return Ok(self.reject(Toast::Session, "", error));
        }
        Ok(Outcome::Reload)
    }

    pub fn generate_graphs(&self, form: &FormContext) -> Result<Outcome, FormError> {
        let (loads, load_points_filter) = match load_selection(form) {
            Ok(selection) => selection,
            Err(FormError::Filter(e)) => {
                return Ok(self.reject(Toast::GenerateGraphs, "Error: ", e.to_string()))
            }
            Err(e) => return Err(e),
        };
        let f = |id: &str| form.field_or_empty(id).to_string();
        let body = GenerateGraphsRequest {
            directory_list: form.checked_directories(),
            labels: form.directory_labels(),
            grouped_metrics: form.grouped_metrics(),
            graph_type: f("graph-type"),
            language: f("language"),
            overwrite: f("overwrite"),
            use_grid: f("use-grid"),
            ylim_low: f("ylim-low"),
            ylim_up: f("ylim-up"),
            x_axis_direction: f("x-axis-direction"),
            title: f("title"),
            xlabel: f("xlabel"),
            ylabel: f("ylabel"),
            figure_width: f("figure-width"),
            figure_height: f("figure-height"),
            graph_font_size: f("graph-font-size"),
            legend_font_size: f("legend-font-size"),
            legend_position: f("legend-position"),
            anchor_x: f("anchor-x"),
            anchor_y: f("anchor-y"),
            frameon: f("frameon"),
            max_columns: f("max-columns"),
            loads,
            load_points_filter,
        };
        let resp = self.post(endpoints::GENERATE_GRAPHS, &body)?;
        Ok(self.report(Toast::GenerateGraphs, resp))
    }

    pub fn export_results(&self, form: &FormContext) -> Result<Outcome, FormError> {
        let (loads, load_points_filter) = match load_selection(form) {
            Ok(selection) => selection,
            Err(FormError::Filter(e)) => {
                return Ok(self.reject(Toast::ExportResults, "Error: ", e.to_string()))
            }
            Err(e) => return Err(e),
        };
        let body = ExportResultsRequest {
            directory_list: form.checked_directories(),
            labels: form.directory_labels(),
            grouped_metrics: form.grouped_metrics(),
            overwrite: form.field_or_empty("overwrite").to_string(),
            loads,
            load_points_filter,
        };
        let resp = self.post(endpoints::EXPORT_RESULTS, &body)?;
        Ok(self.report(Toast::ExportResults, resp))
    }

    /// Drop all server-side session data after the user confirms.
    pub fn clear_session(&self) -> Result<Outcome, FormError> {
        if !self.notifier.confirm(CLEAR_SESSION_PROMPT) {
            return Ok(Outcome::Unchanged);
        }
        let resp = self.backend.post(endpoints::CLEAR_SESSION, None)?;
        match (resp.message, resp.error) {
            (Some(message), _) => {
                self.notifier.show(Toast::Session, &message, Severity::Success);
                Ok(Outcome::Reload)
            }
            (None, error) => Ok(self.reject(
                Toast::Session,
                "Failed to clear session: ",
                error.unwrap_or_default(),
            )),
        }
    }

    fn report(&self, toast: Toast, resp: ApiResponse) -> Outcome {
        if let Some(error) = resp.error {
            return self.reject(toast, "Error: ", error);
        }
        let message = resp.message.unwrap_or_default();
        self.notifier.show(toast, &message, Severity::Success);
        Outcome::Applied
    }
}

/// Loads to send with generate/export requests.
///
/// Custom loads go out as a slot-index map with an empty filter. Otherwise
/// the load-points filter is validated against the slot count and sent as
/// typed.
pub fn load_selection(form: &FormContext) -> Result<(BTreeMap<String, String>, String), FormError> {
    if form.toggle("use-custom-loads") {
        return Ok((form.load_map(), String::new()));
    }
    let filter = form.field_or_empty("load-points-filter").to_string();
    if !form.loads.is_empty() {
        parse_load_points(&filter, form.loads.len())?;
    }
    Ok((BTreeMap::new(), filter))
}

/// Reflect a loaded configuration into the form.
///
/// Directories are reset before the listed ones are checked and labelled.
/// Metric groups named in the config are expanded and their metrics checked.
/// Load slots are decoded from the graph config.
pub fn apply_config_data(form: &mut FormContext, data: &ConfigData) {
    if let Some(directories) = &data.directories {
        form.reset_directories();
        for (dir, label) in directories {
            match form.directory_mut(dir) {
                Ok(entry) => {
                    entry.set_checked(true);
                    entry.label = label.clone();
                }
                Err(_) => tracing::warn!(directory = %dir, "configured directory not in form"),
            }
        }
    }

    if let Some(metrics) = &data.metrics {
        for (group, list) in metrics {
            if let Ok(g) = form.metric_group_mut(group) {
                g.expanded = true;
            }
            for metric in list {
                if !form.check_metric(metric) {
                    tracing::warn!(%metric, "configured metric not in form");
                }
            }
        }
    }

    if let Some(graph) = &data.graph_config {
        decode_loads(&graph.loads, graph.load_filter.as_deref(), form);
        tracing::debug!(slots = form.loads.len(), values = graph.loads.len(), "decoded loads");
    }
}
