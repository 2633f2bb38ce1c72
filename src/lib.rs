//! Headless form layer for the graph-generation configuration UI.
//!
//! The form state lives in [`FormContext`]; [`FormClient`] runs the form
//! actions against a [`Backend`] and reports through a [`Notifier`]. Load
//! inputs travel as compact values plus a range-string, see
//! [`encode_loads`] and [`decode_loads`].

pub mod actions;
pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod io_utils;
pub mod load_filter;
pub mod notify;
pub mod payload;

pub use actions::{apply_config_data, load_selection, FormClient, Outcome};
pub use backend::{endpoints, Backend, HttpBackend};
pub use config::{BodyEncoding, Config};
pub use error::FormError;
pub use form::{Checkbox, DirectoryEntry, FormContext, MetricGroup, RadioGroup};
pub use load_filter::{
    decode_loads, encode_loads, index_runs, parse_load_points, render_runs, select_load_points,
    EncodedLoads, FilterError, LoadSlots,
};
pub use notify::{ConsoleNotifier, Notifier, Severity, Toast};
pub use payload::{ApiResponse, ConfigData, GraphConfig};
