use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use tocsin::environment::Config;
use tocsin::location::LocationDirectory;
use tocsin::logging::configure_logging;
use tocsin::service::AlertService;
use tocsin::web::app_api_loop;

#[derive(Parser)]
#[command(version, about = "Synthetic, personalized emergency alerts by ZIP code")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve {
        /// Port to listen on; overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one alert and print it as JSON.
    Alert {
        /// 5-digit ZIP code.
        zip_code: String,
    },
    /// List the known ZIP codes.
    Zips,
}

fn load_directory(config: &Config) -> Result<LocationDirectory> {
    let directory = match &config.locations_path {
        Some(path) => {
            info!("Loading locations from {}", path.display());
            LocationDirectory::from_json_file(path)?
        }
        None => LocationDirectory::builtin(),
    };
    info!("Loaded {} locations", directory.len());
    Ok(directory)
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let cli = Cli::parse();
    let config = Config::from_env();
    let service = AlertService::new(
        load_directory(&config)?,
        Arc::new(config.llm_params()),
        config.language_overrides.clone(),
    )
    .context("location reference data failed validation")?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Zips => {
            let directory = service.directory();
            for code in directory.codes() {
                if let Some(profile) = directory.get(&code) {
                    println!("{}  {}", code, profile.neighborhood);
                }
            }
        }
        Command::Alert { zip_code } => {
            let response = service.build_alert(&zip_code).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Serve { port } => {
            app_api_loop(service, port.unwrap_or(config.port)).await?;
        }
    }

    Ok(())
}
