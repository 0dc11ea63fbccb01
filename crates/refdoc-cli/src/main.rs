// crates/refdoc-cli/src/main.rs
// ============================================================================
// Module: refdoc CLI Entry Point
// Description: Command dispatcher for reference documentation generation.
// Purpose: Generate, verify, and inspect docs built from a reference config.
// Dependencies: clap, refdoc-core, thiserror.
// ============================================================================

//! ## Overview
//! The refdoc CLI loads `refdoc.toml`, builds snippets from the reference
//! configuration document, and writes or verifies the generated Markdown
//! pages. Generation events go to the sink selected in the config file.
//! Every failure is reported as one line on stderr with a non-zero exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

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
use refdoc_core::EventSink;
use refdoc_core::GeneratorConfig;
use refdoc_core::artifacts::LINTERS_DISABLED_FILE;
use refdoc_core::artifacts::LINTERS_ENABLED_FILE;
use refdoc_core::build_from_paths;
use refdoc_core::generate_artifacts;
use refdoc_core::policy::CONTAINER_KEYS;
use refdoc_core::verify_artifacts;
use refdoc_core::write_artifacts;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "refdoc", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to `REFDOC_CONFIG`, then `refdoc.toml`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the Markdown pages into the output directory.
    Generate(OutputArgs),
    /// Fail when generated pages differ from the files on disk.
    Verify(OutputArgs),
    /// Print the enabled or disabled linter table.
    Tables(TablesCommand),
    /// Print the rendered settings sections of one container.
    Sections(SectionsCommand),
}

/// Output directory override shared by `generate` and `verify`.
#[derive(Args, Debug)]
struct OutputArgs {
    /// Output directory (overrides `output_dir` from the config).
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
}

/// Arguments for `tables`.
#[derive(Args, Debug)]
struct TablesCommand {
    /// Print linters disabled by default instead of enabled ones.
    #[arg(long)]
    disabled: bool,
}

/// Arguments for `sections`.
#[derive(Args, Debug)]
struct SectionsCommand {
    /// Container key (`linters` or `formatters`).
    #[arg(long, value_name = "NAME")]
    container: String,
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
    let config = GeneratorConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let sink = config
        .events
        .build_sink()
        .map_err(|err| CliError::new(format!("failed to open event log: {err}")))?;

    match cli.command {
        Commands::Generate(args) => command_generate(&config, sink, &args),
        Commands::Verify(args) => command_verify(&config, sink, &args),
        Commands::Tables(command) => command_tables(&config, sink, &command),
        Commands::Sections(command) => command_sections(&config, sink, &command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `generate` command.
fn command_generate(
    config: &GeneratorConfig,
    sink: Arc<dyn EventSink>,
    args: &OutputArgs,
) -> CliResult<ExitCode> {
    let dir = output_dir(config, args);
    let artifacts = generate_artifacts(config, sink)
        .map_err(|err| CliError::new(format!("generation failed: {err}")))?;
    write_artifacts(dir, &artifacts)
        .map_err(|err| CliError::new(format!("failed to write docs: {err}")))?;
    write_stdout_line(&format!("wrote {} files to {}", artifacts.len(), dir.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `verify` command.
fn command_verify(
    config: &GeneratorConfig,
    sink: Arc<dyn EventSink>,
    args: &OutputArgs,
) -> CliResult<ExitCode> {
    let dir = output_dir(config, args);
    let artifacts = generate_artifacts(config, sink)
        .map_err(|err| CliError::new(format!("generation failed: {err}")))?;
    verify_artifacts(dir, &artifacts)
        .map_err(|err| CliError::new(format!("verification failed: {err}")))?;
    write_stdout_line(&format!("{} files up to date in {}", artifacts.len(), dir.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `tables` command.
fn command_tables(
    config: &GeneratorConfig,
    sink: Arc<dyn EventSink>,
    command: &TablesCommand,
) -> CliResult<ExitCode> {
    let wanted = if command.disabled { LINTERS_DISABLED_FILE } else { LINTERS_ENABLED_FILE };
    let artifacts = generate_artifacts(config, sink)
        .map_err(|err| CliError::new(format!("generation failed: {err}")))?;
    let table = artifacts
        .into_iter()
        .find(|artifact| artifact.file_name == wanted)
        .ok_or_else(|| {
            CliError::new(format!(
                "no linter metadata found under {}",
                config.assets_path.display()
            ))
        })?;
    write_stdout_text(&table.content).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `sections` command.
fn command_sections(
    config: &GeneratorConfig,
    sink: Arc<dyn EventSink>,
    command: &SectionsCommand,
) -> CliResult<ExitCode> {
    let container = validate_container(&command.container)?;
    let snippets = build_from_paths(config, sink)
        .map_err(|err| CliError::new(format!("generation failed: {err}")))?;
    write_stdout_text(&snippets.container_text(container))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the output directory from the flag or the config.
fn output_dir<'a>(config: &'a GeneratorConfig, args: &'a OutputArgs) -> &'a Path {
    args.output.as_deref().unwrap_or(&config.output_dir)
}

/// Checks that `name` is a container key.
fn validate_container(name: &str) -> CliResult<&str> {
    if CONTAINER_KEYS.contains(&name) {
        Ok(name)
    } else {
        Err(CliError::new(format!(
            "unknown container `{name}` (expected one of: {})",
            CONTAINER_KEYS.join(", ")
        )))
    }
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes text to stdout as-is.
fn write_stdout_text(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
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
