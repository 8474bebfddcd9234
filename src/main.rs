//! CLI entry point for the survey collector.
//!
//! Provides subcommands for serving the HTTP API, printing the current
//! tabulation, and exporting every stored survey as CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use survey_collector::{
    api::start_server, config::Config, export::write_csv_file, services::SurveyService, store,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "survey_collector")]
#[command(about = "Collects survey submissions and reports on them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the survey HTTP API
    Serve {
        /// Address to bind (defaults to HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Database URL, or "memory" for a throwaway store
        #[arg(long)]
        database_url: Option<String>,
    },
    /// Print the tabulation of every stored survey as JSON
    Analyze {
        /// Database URL, or "memory" for a throwaway store
        #[arg(long)]
        database_url: Option<String>,

        /// Also write the JSON to this file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Export every stored survey as CSV, newest first
    Export {
        /// Database URL, or "memory" for a throwaway store
        #[arg(long)]
        database_url: Option<String>,

        /// CSV file to write
        #[arg(short, long, default_value = "survey_data.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("survey_collector.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(
            "info"
                .parse()
                .context("invalid default stderr log directive")?,
        ));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(
            "debug"
                .parse()
                .context("invalid default JSON log directive")?,
        ));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            database_url,
        } => {
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);
            let service = open_service(database_url.unwrap_or(config.database_url)).await?;

            start_server(service, &host, port)
                .with_context(|| format!("failed to bind {host}:{port}"))?
                .await?;
        }
        Commands::Analyze {
            database_url,
            output,
        } => {
            let service = open_service(database_url.unwrap_or(config.database_url)).await?;
            let tabulation = service.analysis().await?;
            let json = serde_json::to_string_pretty(&tabulation)?;

            info!("{}", json);
            if let Some(path) = output {
                std::fs::write(&path, &json).with_context(|| format!("failed to write {path}"))?;
                info!(path, "Analysis written");
            }
        }
        Commands::Export {
            database_url,
            output,
        } => {
            let service = open_service(database_url.unwrap_or(config.database_url)).await?;
            let records = service.list().await?;
            write_csv_file(&output, &records)?;
        }
    }

    Ok(())
}

#[tracing::instrument]
async fn open_service(database_url: String) -> Result<SurveyService> {
    let store = store::open(&database_url).await?;
    Ok(SurveyService::new(store))
}
