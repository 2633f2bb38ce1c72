use std::fmt;
use std::io::{self, BufRead, Write};

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => f.write_str("success"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Which notification area a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toast {
    InputConfig,
    OutputConfig,
    GenerateGraphs,
    ExportResults,
    /// Session-wide messages (metric type, custom loads, clear session).
    Session,
}

impl Toast {
    pub fn id(self) -> &'static str {
        match self {
            Toast::InputConfig => "input-config-toast",
            Toast::OutputConfig => "output-config-toast",
            Toast::GenerateGraphs => "generate-graphs-toast",
            Toast::ExportResults => "export-results-toast",
            Toast::Session => "session-toast",
        }
    }
}

/// Sink for user-facing messages, injected into every action.
pub trait Notifier {
    fn show(&self, toast: Toast, message: &str, severity: Severity);

    /// Ask the user to confirm a destructive step.
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Prints notifications to stderr and asks for confirmation on stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier {
    /// Answer every confirmation with yes.
    pub assume_yes: bool,
}

impl Notifier for ConsoleNotifier {
    fn show(&self, toast: Toast, message: &str, severity: Severity) {
        eprintln!("[{}] {}: {}", severity, toast.id(), message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }
}
