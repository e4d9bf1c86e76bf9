//! QAP ingestion CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use qap_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_render, run_schemas, run_upload};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Upload(args) => run_upload(args),
        Command::Render(args) => run_render(args),
        Command::Schemas => {
            run_schemas();
            std::process::exit(0);
        }
    };
    let exit_code = match result {
        Ok(report) => {
            print_summary(&report);
            i32::from(report.has_failures())
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit_level = cli.log_level.map(|level| match level {
        LogLevelArg::Error => LevelFilter::ERROR,
        LogLevelArg::Warn => LevelFilter::WARN,
        LogLevelArg::Info => LevelFilter::INFO,
        LogLevelArg::Debug => LevelFilter::DEBUG,
        LogLevelArg::Trace => LevelFilter::TRACE,
    });
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level(explicit_level.unwrap_or_else(|| cli.verbosity.tracing_level_filter()))
        .with_env_filter(!(cli.verbosity.is_present() || explicit_level.is_some()))
        .with_format(format)
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_log_flags() {
        let cli = Cli::try_parse_from([
            "qap-ingest",
            "schemas",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--log-file",
            "qap.log",
            "--log-data",
            "--color",
            "always",
        ])
        .unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file.as_deref(), Some(Path::new("qap.log")));
        assert!(config.log_data);
        assert!(config.with_ansi);
    }

    #[test]
    fn test_default_flags() {
        let cli = Cli::try_parse_from(["qap-ingest", "--color", "never", "schemas"]).unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.log_file.is_none());
        assert!(!config.log_data);
        assert!(!config.with_ansi);

        let cli = Cli::try_parse_from(["qap-ingest", "-vv", "schemas"]).unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
    }
}
