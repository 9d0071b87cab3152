// crates/tenant-dispatch-cli/src/main.rs
// ============================================================================
// Module: Tenant Dispatch CLI Entry Point
// Description: Command dispatcher for config validation, catalogs, and dry runs.
// Purpose: Inspect workload configs and exercise dispatchers without a data layer.
// Dependencies: clap, tenant-dispatch-config, tenant-dispatch-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `tenant-dispatch` CLI loads a workload configuration, prints the
//! operation catalog a dispatcher would serve for a scenario, and runs
//! threaded dry-run simulations that drive the tenant init gate the same way
//! a load engine would.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod simulate;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use tenant_dispatch_config::WorkloadConfig;
use tenant_dispatch_core::NoopInitAuditSink;
use tenant_dispatch_core::Operation;
use tenant_dispatch_core::OperationDispatcher;
use tenant_dispatch_core::OperationKind;
use tenant_dispatch_core::TableName;
use thiserror::Error;

use crate::simulate::DryRunFactory;
use crate::simulate::SimulationOptions;
use crate::simulate::run_simulation;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Worker threads used when `--workers` is not given.
const DEFAULT_WORKERS: usize = 4;
/// Maximum worker threads accepted by `simulate`.
const MAX_WORKERS: usize = 256;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "tenant-dispatch", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected command.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print the operation catalog for a scenario.
    Catalog(CatalogCommand),
    /// Run a dry-run simulation of a scenario.
    Simulate(SimulateCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a workload configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to tenant-dispatch.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Model and scenario selection shared by scenario commands.
#[derive(Args, Debug)]
struct ScenarioSelection {
    /// Data model name.
    #[arg(long, value_name = "NAME")]
    model: String,
    /// Scenario name within the model.
    #[arg(long, value_name = "NAME")]
    scenario: String,
    /// Optional config file path (defaults to tenant-dispatch.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for catalog output.
#[derive(Args, Debug)]
struct CatalogCommand {
    /// Scenario to describe.
    #[command(flatten)]
    selection: ScenarioSelection,
}

/// Arguments for dry-run simulation.
#[derive(Args, Debug)]
struct SimulateCommand {
    /// Scenario to simulate.
    #[command(flatten)]
    selection: ScenarioSelection,
    /// Worker threads dispatching concurrently.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_WORKERS)]
    workers: usize,
    /// Requests to dispatch (defaults to the load profile's operation count).
    #[arg(long, value_name = "N")]
    requests: Option<u64>,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// JSON description of a scenario's operation catalog.
#[derive(Debug, Serialize)]
struct CatalogReport<'a> {
    /// Data model name.
    model: &'a str,
    /// Scenario name.
    scenario: &'a str,
    /// Table the scenario targets.
    table_name: &'a TableName,
    /// Tenants declared by the load profile.
    total_tenants: u64,
    /// Setup operation run once per tenant.
    setup: Option<&'a Operation>,
    /// Steady-state operations in catalog order.
    operations: &'a [Operation],
    /// Kinds with a registered unit.
    registered_kinds: Vec<OperationKind>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Catalog(command) => command_catalog(&command),
        Commands::Simulate(command) => command_simulate(&command),
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    write_stdout_line(&validation_summary(&config))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Formats the one-line summary printed by `config validate`.
fn validation_summary(config: &WorkloadConfig) -> String {
    format!(
        "config ok: {} model(s), {} scenario(s)",
        config.models.len(),
        config.scenario_count()
    )
}

// ============================================================================
// SECTION: Scenario Commands
// ============================================================================

/// Executes the catalog command.
fn command_catalog(command: &CatalogCommand) -> CliResult<ExitCode> {
    let selection = &command.selection;
    let config = load_config(selection.config.as_deref())?;
    let model = config.model(&selection.model).map_err(|err| CliError::new(err.to_string()))?;
    let factory = DryRunFactory::new();
    let dispatcher =
        OperationDispatcher::new(&factory, model, &selection.scenario, Arc::new(NoopInitAuditSink))
            .map_err(|err| CliError::new(err.to_string()))?;
    let scenario = dispatcher.scenario();
    let report = CatalogReport {
        model: &model.name,
        scenario: &scenario.name,
        table_name: &scenario.table_name,
        total_tenants: scenario.total_tenants(),
        setup: dispatcher.catalog().setup_operation(),
        operations: dispatcher.operations(),
        registered_kinds: dispatcher.registered_kinds(),
    };
    write_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the simulate command.
fn command_simulate(command: &SimulateCommand) -> CliResult<ExitCode> {
    let options = simulation_options(command)?;
    let selection = &command.selection;
    let config = load_config(selection.config.as_deref())?;
    let model = config.model(&selection.model).map_err(|err| CliError::new(err.to_string()))?;
    let scenario = config
        .scenario(&selection.model, &selection.scenario)
        .map_err(|err| CliError::new(err.to_string()))?;
    let options = SimulationOptions {
        requests: options.requests.unwrap_or(scenario.load_profile.num_operations),
        workers: options.workers,
    };
    let audit = config.audit.build_sink().map_err(|err| CliError::new(err.to_string()))?;
    let summary = run_simulation(model, &selection.scenario, options, audit)
        .map_err(|err| CliError::new(format!("simulation failed: {err}")))?;
    let failed = summary.failed;
    write_json(&summary)?;
    if failed > 0 { Ok(ExitCode::FAILURE) } else { Ok(ExitCode::SUCCESS) }
}

/// Requested simulation parameters before defaults are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestedSimulation {
    /// Worker threads.
    workers: usize,
    /// Explicit request count, if given.
    requests: Option<u64>,
}

/// Validates simulate arguments.
fn simulation_options(command: &SimulateCommand) -> CliResult<RequestedSimulation> {
    if command.workers == 0 || command.workers > MAX_WORKERS {
        return Err(CliError::new(format!("--workers must be between 1 and {MAX_WORKERS}")));
    }
    Ok(RequestedSimulation {
        workers: command.workers,
        requests: command.requests,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates the workload configuration.
fn load_config(path: Option<&Path>) -> CliResult<WorkloadConfig> {
    WorkloadConfig::load(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Writes a value to stdout as pretty-printed JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
