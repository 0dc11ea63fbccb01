// crates/refdoc-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and helper resolution.
// Purpose: Ensure flags map onto the right commands and defaults.
// Dependencies: clap, refdoc-cli main helpers
// ============================================================================

//! ## Overview
//! Validates CLI parsing, output directory resolution, and container checks.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use clap::CommandFactory;
use clap::Parser;

use super::Cli;
use super::Commands;
use super::GeneratorConfig;
use super::OutputArgs;
use super::output_dir;
use super::validate_container;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn global_config_flag_parses_after_subcommand() {
    let cli = Cli::try_parse_from(["refdoc", "generate", "--config", "custom.toml", "--output", "out"])
        .unwrap();
    assert_eq!(cli.config.as_deref(), Some(Path::new("custom.toml")));
    match cli.command {
        Commands::Generate(args) => assert_eq!(args.output.as_deref(), Some(Path::new("out"))),
        _ => panic!("expected generate"),
    }
}

#[test]
fn tables_and_sections_parse_flags() {
    let cli = Cli::try_parse_from(["refdoc", "tables", "--disabled"]).unwrap();
    assert!(matches!(cli.command, Commands::Tables(command) if command.disabled));

    let cli = Cli::try_parse_from(["refdoc", "sections", "--container", "formatters"]).unwrap();
    assert!(matches!(cli.command, Commands::Sections(command) if command.container == "formatters"));

    assert!(Cli::try_parse_from(["refdoc", "sections"]).is_err());
    assert!(Cli::try_parse_from(["refdoc"]).is_err());
}

#[test]
fn output_flag_overrides_config() {
    let config = GeneratorConfig::default();
    let none = OutputArgs {
        output: None,
    };
    assert_eq!(output_dir(&config, &none), Path::new("docs/generated"));
    let some = OutputArgs {
        output: Some("site".into()),
    };
    assert_eq!(output_dir(&config, &some), Path::new("site"));
}

#[test]
fn only_container_keys_are_accepted() {
    assert_eq!(validate_container("linters").unwrap(), "linters");
    assert_eq!(validate_container("formatters").unwrap(), "formatters");
    let err = validate_container("run").unwrap_err();
    assert_eq!(err.to_string(), "unknown container `run` (expected one of: linters, formatters)");
}
