use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pomscan::adapters::outbound::formatters::ScanReport;
use pomscan::adapters::outbound::network::{CachingRegistryClient, HttpRegistryClient};
use pomscan::adapters::outbound::resolution::RegistryResolutionClient;
use pomscan::cli::{Args, OutputFormat};
use pomscan::config;
use pomscan::extractor::{pomxmlnet, ScanInput};
use pomscan::ports::outbound::{RegistryClient, ResolutionClient};
use pomscan::shared::{ExitCode, Result};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("\n{}\n", "An error occurred:".red().bold());
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let manifest = resolve_manifest_path(args.path.as_deref())?;
    let scan_dir = manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = config::discover_config(&scan_dir)?.unwrap_or_default();

    let registry_url = args.registry.or(config.registry);
    let format = match args.format {
        Some(format) => format,
        None => config
            .format
            .as_deref()
            .unwrap_or("json")
            .parse::<OutputFormat>()
            .map_err(|e| anyhow::anyhow!(e))?,
    };

    // Wire the adapters: HTTP registry behind a cache, and graph
    // resolution walking the same registry.
    let http = HttpRegistryClient::new(registry_url.as_deref())?;
    let registry: Arc<dyn RegistryClient> = Arc::new(CachingRegistryClient::new(http));
    let resolution: Arc<dyn ResolutionClient> =
        Arc::new(RegistryResolutionClient::new(Arc::clone(&registry)));
    let extractor = pomxmlnet::Extractor::new(registry, resolution);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(format!("Resolving {}", manifest.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let ctx = CancellationToken::new();
    let file_name = manifest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pom.xml".to_string());
    let input = ScanInput::new(&scan_dir, file_name);
    let result = extractor.extract(&ctx, &input).await;
    spinner.finish_and_clear();
    let inventory = result?;

    eprintln!(
        "{} {} package(s) resolved",
        "done:".green().bold(),
        inventory.packages.len()
    );

    let report = ScanReport::new(&manifest.display().to_string(), inventory.packages);
    let formatted = format.create_formatter().format(&report)?;

    match args.output {
        Some(path) => std::fs::write(&path, &formatted)
            .map_err(|e| anyhow::anyhow!("failed to write output to {path}: {e}"))?,
        None => println!("{formatted}"),
    }

    Ok(())
}

/// Accepts either a pom.xml path or a directory containing one.
fn resolve_manifest_path(arg: Option<&str>) -> Result<PathBuf> {
    let path = PathBuf::from(arg.unwrap_or("."));
    let manifest = if path.is_dir() { path.join("pom.xml") } else { path };
    if !manifest.is_file() {
        anyhow::bail!(
            "no pom.xml found at {} - specify a manifest or a project directory",
            manifest.display()
        );
    }
    Ok(manifest)
}
