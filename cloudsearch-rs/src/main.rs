//! CloudSearch CLI entry point.

use clap::Parser;
use cloudsearch::cli::args::{Cli, Commands};
use cloudsearch::cli::output::Output;
use cloudsearch::cli::query::HitId;
use cloudsearch::cli::{delete, search};
use cloudsearch::client::CloudSearch;
use cloudsearch::config::CloudSearchSettings;
use cloudsearch::error::{CloudSearchError, ExitCode as CliExitCode};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<CloudSearchSettings, CloudSearchError> {
    let mut settings =
        CloudSearchSettings::load_with(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    if let Some(domain) = &cli.domain {
        settings.search_id = domain.clone();
    }
    Ok(settings)
}

fn run(cli: &Cli) -> Result<CliExitCode, CloudSearchError> {
    let settings = load_settings(cli)?;
    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::Config => {
            output.print(&settings)?;
            Ok(CliExitCode::Success)
        }
        Commands::Url(args) => {
            let client = CloudSearch::<HitId>::new(settings)?;
            search::url(&client, args, &output)?;
            Ok(CliExitCode::Success)
        }
        Commands::Search(args) => {
            let client = CloudSearch::<HitId>::new(settings)?;
            search::run(&client, args, &output)?;
            Ok(CliExitCode::Success)
        }
        Commands::Delete(args) => {
            let client = CloudSearch::<HitId>::new(settings)?;
            delete::run(&client, args, &output)
        }
    }
}
