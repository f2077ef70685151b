use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use railway_provider::config::ProviderConfig;
use railway_provider::error::ProviderError;
use railway_provider::provider::{ConfiguredProvider, Provider};
use railway_provider::VERSION;
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Terraform provider for Railway
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-railway", version = VERSION, about, long_about = None)]
struct Args {
    /// Railway API token (defaults to RAILWAY_TOKEN, then the config file)
    #[arg(long, global = true)]
    token: Option<String>,

    /// GraphQL endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resource and data source types
    Resources,
    /// Print the schema of the provider or of one type
    Schema { type_name: Option<String> },
    /// Validate a configuration record without calling the API
    Validate {
        type_name: String,
        /// JSON record file, stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Create a resource from a planned record
    Create { type_name: String, file: Option<PathBuf> },
    /// Refresh a resource record, or read a data source
    Read { type_name: String, file: Option<PathBuf> },
    /// Update a resource from a planned record and its prior state
    Update {
        type_name: String,
        #[arg(long)]
        plan: PathBuf,
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete a resource
    Delete { type_name: String, file: Option<PathBuf> },
    /// Import an existing resource by identifier
    Import { type_name: String, id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Stdout carries the JSON result, so logs only ever go to the file
    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("terraform-provider-railway {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir
            .join("terraform-provider-railway")
            .join("terraform-provider-railway.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home
            .join(".terraform-provider-railway")
            .join("terraform-provider-railway.log");
    }
    PathBuf::from("terraform-provider-railway.log")
}

/// Read a JSON record from `path`, or stdin when absent or `-`
fn read_record(path: Option<&PathBuf>) -> Result<Value> {
    let content = match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    serde_json::from_str(&content).context("Record is not valid JSON")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn unknown_type(type_name: &str) -> ProviderError {
    ProviderError::NotFound(format!("type {}", type_name))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let provider = Provider::new(VERSION);
    let config = ProviderConfig {
        token: args.token.clone(),
        endpoint: args.endpoint.clone(),
    };

    match run(&provider, config, args.command).await {
        Ok(output) => {
            print_json(&output)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!("operation failed: {}", err);
            print_json(&json!({ "diagnostics": err.into_diagnostics() }))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(provider: &Provider, config: ProviderConfig, command: Command) -> Result<Value, ProviderError> {
    match command {
        Command::Resources => {
            let offline = ConfiguredProvider::offline();
            Ok(json!({
                "provider": provider.type_name(),
                "version": provider.version(),
                "resources": offline.resource_types().collect::<Vec<_>>(),
                "data_sources": offline.data_source_types().collect::<Vec<_>>(),
            }))
        }
        Command::Schema { type_name } => {
            let offline = ConfiguredProvider::offline();
            let schema = match type_name.as_deref() {
                None => provider.schema(),
                Some(name) => match (offline.resource(name), offline.data_source(name)) {
                    (Some(resource), _) => resource.schema(),
                    (None, Some(data_source)) => data_source.schema(),
                    (None, None) => return Err(unknown_type(name)),
                },
            };
            Ok(serde_json::to_value(schema)?)
        }
        Command::Validate { type_name, file } => {
            let record = read_input(file.as_ref())?;
            let offline = ConfiguredProvider::offline();
            let diags = match (offline.resource(&type_name), offline.data_source(&type_name)) {
                (Some(resource), _) => resource.validate_config(&record),
                (None, Some(data_source)) => data_source.validate_config(&record),
                (None, None) => return Err(unknown_type(&type_name)),
            };
            if diags.has_error() {
                return Err(ProviderError::Validation(diags));
            }
            Ok(json!({ "diagnostics": diags }))
        }
        Command::Create { type_name, file } => {
            let record = read_input(file.as_ref())?;
            let configured = provider.configure(config)?;
            let resource = configured.resource(&type_name).ok_or_else(|| unknown_type(&type_name))?;
            resource.create_record(record).await
        }
        Command::Read { type_name, file } => {
            let record = read_input(file.as_ref())?;
            let configured = provider.configure(config)?;
            match (configured.resource(&type_name), configured.data_source(&type_name)) {
                (Some(resource), _) => resource.read_record(record).await,
                (None, Some(data_source)) => data_source.read_record(record).await,
                (None, None) => Err(unknown_type(&type_name)),
            }
        }
        Command::Update { type_name, plan, state } => {
            let plan = read_input(Some(&plan))?;
            let state = read_input(Some(&state))?;
            let configured = provider.configure(config)?;
            let resource = configured.resource(&type_name).ok_or_else(|| unknown_type(&type_name))?;
            resource.update_record(plan, state).await
        }
        Command::Delete { type_name, file } => {
            let record = read_input(file.as_ref())?;
            let configured = provider.configure(config)?;
            let resource = configured.resource(&type_name).ok_or_else(|| unknown_type(&type_name))?;
            resource.delete_record(record).await?;
            Ok(Value::Null)
        }
        Command::Import { type_name, id } => {
            let configured = provider.configure(config)?;
            let resource = configured.resource(&type_name).ok_or_else(|| unknown_type(&type_name))?;
            resource.import_record(&id).await
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<Value, ProviderError> {
    read_record(path).map_err(ProviderError::Input)
}
