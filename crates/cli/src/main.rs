use anyhow::Context;
use clap::Parser;
use pqc_scan_core::ScanConfig;
use pqc_scan_pipeline::{InMemoryJobStore, InMemoryScanStore, ScanPipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pqscan")]
#[command(about = "Scan a repository for quantum-vulnerable cryptography")]
#[command(version)]
struct Cli {
    /// Repository to scan: a remote URL, a file:// URI or a local path.
    target: String,

    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    let jobs = InMemoryJobStore::new();
    let scans = InMemoryScanStore::new();
    let scan_id = Uuid::new_v4();
    info!(%scan_id, target = %cli.target, "starting scan");

    let pipeline = ScanPipeline::new(config);
    match pipeline.run(scan_id, &cli.target, &jobs, &scans).await {
        Ok(outcome) => match serde_json::to_string_pretty(&outcome) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: could not serialize result: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<ScanConfig> {
    match path {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn init_tracing(config: &ScanConfig) {
    let level = match config.logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(config.logging.format.to_lowercase() != "json")
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
