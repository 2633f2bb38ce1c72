use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::FormError;

/// Failures reported by the `loadform` binary, each with a hint for the user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{action} form snapshot '{}': {source}. {}", .path.display(), snapshot_hint(.source))]
    Snapshot {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {}", cli_hint(.source))]
    Form {
        context: &'static str,
        #[source]
        source: FormError,
    },

    #[error("rejected: {0}")]
    Rejected(String),
}

impl CliError {
    pub fn snapshot(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CliError::Snapshot {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn form(context: &'static str, source: impl Into<FormError>) -> Self {
        CliError::Form {
            context,
            source: source.into(),
        }
    }
}

fn snapshot_hint(err: &io::Error) -> &'static str {
    match err.kind() {
        io::ErrorKind::NotFound => "Write a snapshot first or point --form at an existing one.",
        io::ErrorKind::PermissionDenied => "The snapshot must be readable and writable.",
        io::ErrorKind::InvalidData => "The snapshot must be UTF-8 JSON.",
        _ => "Check the --form path.",
    }
}

/// Return an actionable hint for a `FormError` variant.
pub fn cli_hint(err: &FormError) -> String {
    use FormError::*;
    match err {
        MissingElement(id) => format!("form snapshot has no element '{id}'. Add it to the snapshot."),
        Filter(e) => format!("{e}. Use indices like '0-2,5'."),
        Transport(e) => format!("{e}. Is the backend running and reachable?"),
        Status { status, path } => format!("{path} answered HTTP {status}. Check the backend logs."),
        Json(e) => format!("{e}. The snapshot or backend reply does not have the expected shape."),
        Config(msg) => format!("{msg}. Fix the TOML config or the LOADFORM_* variables."),
        Io(e) if e.kind() == io::ErrorKind::NotFound => format!("{e}. Check the --config path."),
        Io(e) => format!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_snapshot_names_the_form_flag() {
        let err = CliError::snapshot(
            "reading",
            "snap.json",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("reading form snapshot 'snap.json': gone."));
        assert!(msg.contains("--form"));
    }

    #[test]
    fn missing_config_names_the_config_flag() {
        let err = CliError::form(
            "reading config",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "reading config: gone. Check the --config path.");
    }

    #[test]
    fn filter_errors_suggest_syntax() {
        let err = CliError::form(
            "invalid load-points filter",
            crate::FilterError::InvalidIndex("x".into()),
        );
        assert!(err.to_string().contains("'0-2,5'"));
    }
}
