//! CVS survey reporter CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use cvs_cli::commands::{
    run_entry, run_fields, run_import, run_mapping_reset, run_mapping_show, run_mapping_suggest,
};
use cvs_cli::logging::{LogConfig, init_logging};
use cvs_cli::prompt::TerminalPrompter;
use cvs_cli::settings::{Overrides, RunConfig, Settings};
use cvs_core::{InteractiveResolver, MappingResolver, SuggestionResolver};

mod cli;

use crate::cli::{Cli, Command, MappingCommand};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: cannot open log output: {error}");
        std::process::exit(1);
    }
    if let Err(error) = run(cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let settings = Settings::discover(cli.config.as_deref(), &working_dir)?;
    let config = RunConfig::resolve(
        settings,
        Overrides {
            mapping_file: cli.mapping_file,
            output: cli.output,
            charts_dir: cli.charts_dir,
            title: cli.title,
        },
    );

    let stdout = io::stdout();
    let mut output = stdout.lock();
    match cli.command {
        Command::Entry(args) => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            run_entry(&config, &args.set, &mut input, &mut output)?;
        }
        Command::Import(args) => {
            let mut resolver: Box<dyn MappingResolver> = if args.auto_map {
                Box::new(SuggestionResolver::default())
            } else {
                Box::new(InteractiveResolver::new(TerminalPrompter::new(
                    io::stdin().lock(),
                    io::stdout(),
                )))
            };
            run_import(
                &config,
                &args.csv,
                resolver.as_mut(),
                !args.no_save_mapping,
                &mut output,
            )?;
        }
        Command::Mapping(MappingCommand::Show) => run_mapping_show(&config, &mut output)?,
        Command::Mapping(MappingCommand::Reset) => run_mapping_reset(&config, &mut output)?,
        Command::Mapping(MappingCommand::Suggest {
            csv,
            min_confidence,
        }) => run_mapping_suggest(&csv, min_confidence, &mut output)?,
        Command::Fields => run_fields(&mut output)?,
    }
    Ok(())
}

/// `--log-level` beats `-v`/`-q`; either one disables `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from),
        use_env_filter: cli.log_level.is_none() && !cli.verbosity.is_present(),
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        log_data: cli.log_data,
        with_ansi,
        ..LogConfig::default()
    }
}
