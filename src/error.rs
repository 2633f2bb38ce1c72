use thiserror::Error;

use crate::load_filter::FilterError;

#[derive(Error, Debug)]
pub enum FormError {
    /// A control addressed by id or name is not part of the form.
    #[error("form element not found: {0}")]
    MissingElement(String),

    /// Strict load-points filter rejected by the parser.
    #[error("load filter error: {0}")]
    Filter(#[from] FilterError),

    /// Request could not be delivered or the reply could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status.
    #[error("backend returned status {status} for {path}")]
    Status { status: u16, path: String },

    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
