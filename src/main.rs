use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use loadform::{
    decode_loads, encode_loads,
    io_utils::CliError,
    parse_load_points, BodyEncoding, Config, ConsoleNotifier, FormClient, FormContext,
    GraphConfig, HttpBackend, Outcome,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Drive the graph-generation form from the command line.
#[derive(Parser)]
#[command(name = "loadform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode load slot values; pass "" for empty slots.
    Encode { values: Vec<String> },
    /// Decode compact load values into a number of slots.
    Decode {
        #[arg(long)]
        slots: usize,
        #[arg(long)]
        filter: Option<String>,
        values: Vec<String>,
    },
    /// Strictly validate a load-points filter.
    Validate {
        #[arg(long)]
        count: usize,
        filter: String,
    },
    /// Run one form action against the backend using a form snapshot file.
    Action {
        /// JSON form snapshot, rewritten after the action.
        #[arg(long)]
        form: PathBuf,
        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        server: Option<String>,
        /// Send URL-encoded bodies instead of JSON.
        #[arg(long)]
        form_encoded: bool,
        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
        action: ActionKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionKind {
    LoadDirectory,
    LoadConfig,
    SaveConfig,
    UpdateMetricType,
    UpdateUseCustomLoads,
    GenerateGraphs,
    ExportResults,
    ClearSession,
}

fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Encode { values } => {
            let graph: GraphConfig = encode_loads(&values).into();
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
        Command::Decode {
            slots,
            filter,
            values,
        } => {
            let mut out = vec![String::new(); slots];
            decode_loads(&values, filter.as_deref(), &mut out);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Validate { count, filter } => {
            let indices = parse_load_points(&filter, count)
                .map_err(|e| CliError::form("invalid load-points filter", e))?;
            println!("{}", serde_json::to_string(&indices)?);
        }
        Command::Action {
            form,
            config,
            server,
            form_encoded,
            yes,
            action,
        } => run_action(form, config, server, form_encoded, yes, action)?,
    }
    Ok(())
}

fn run_action(
    form_path: PathBuf,
    config: Option<PathBuf>,
    server: Option<String>,
    form_encoded: bool,
    yes: bool,
    action: ActionKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &config {
        Some(path) => Config::load(path).map_err(|e| CliError::form("reading config", e))?,
        None => Config::default(),
    }
    .with_env()
    .map_err(|e| CliError::form("reading environment", e))?;
    if let Some(server) = server {
        cfg.server = server;
    }
    if form_encoded {
        cfg.encoding = BodyEncoding::FormUrlEncoded;
    }

    let text = fs::read_to_string(&form_path)
        .map_err(|e| CliError::snapshot("reading", &form_path, e))?;
    let mut form: FormContext =
        serde_json::from_str(&text).map_err(|e| CliError::form("parsing form snapshot", e))?;
    if form.loads.is_empty() && cfg.load_slots > 0 {
        form.loads = vec![String::new(); cfg.load_slots];
    }

    let backend = HttpBackend::new(&cfg).map_err(|e| CliError::form("creating client", e))?;
    let client = FormClient::new(backend, ConsoleNotifier { assume_yes: yes });
    let outcome = match action {
        ActionKind::LoadDirectory => client.load_directory(&form),
        ActionKind::LoadConfig => client.load_config(&mut form),
        ActionKind::SaveConfig => client.save_config(&form),
        ActionKind::UpdateMetricType => client.update_metric_type(&mut form),
        ActionKind::UpdateUseCustomLoads => client.update_use_custom_loads(&form),
        ActionKind::GenerateGraphs => client.generate_graphs(&form),
        ActionKind::ExportResults => client.export_results(&form),
        ActionKind::ClearSession => client.clear_session(),
    }
    .map_err(|e| CliError::form("action failed", e))?;

    let snapshot = serde_json::to_string_pretty(&form)?;
    fs::write(&form_path, snapshot)
        .map_err(|e| CliError::snapshot("writing", &form_path, e))?;

    match outcome {
        Outcome::Rejected(msg) => Err(CliError::Rejected(msg).into()),
        Outcome::Reload => {
            eprintln!("backend state changed; re-render the form from the server");
            Ok(())
        }
        Outcome::Applied | Outcome::Unchanged => Ok(()),
    }
}
