//! Runtime-to-feature reconciliation server.
//!
//! Loads the baseline feature and the identity table once, then serves
//! reconciliations of a live system against that baseline, either over HTTP
//! or as one-shot commands.
//!
//! Usage:
//!   r2f-server --runtime runtime.json -D sling.feature=/opt/app/launch.json \
//!       -D sling.feature.apiregions.location=/opt/app/data serve --port 8080
//!   r2f-server --config r2f.toml --runtime runtime.json show runtime

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use r2f_engine::{EngineConfig, Reconciler};
use r2f_server::{build_router, ApiState, DumpRuntime};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "r2f-server")]
#[command(about = "Reconciles a live runtime against its launch feature")]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON dump of the live runtime
    #[arg(short, long)]
    runtime: PathBuf,

    /// Framework property override, as key=value
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property)]
    properties: Vec<(String, String)>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// HTTP port
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Print one feature as JSON and exit
    Show {
        #[arg(value_enum)]
        view: View,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum View {
    /// The baseline feature
    Launch,
    /// A snapshot of the live runtime
    Running,
    /// The difference between baseline and live runtime
    Upgrade,
    /// The baseline, or the baseline merged with the drift
    Runtime,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn init_logging(verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .compact()
            .init();
    } else {
        let log_level = if verbose { Level::DEBUG } else { Level::INFO };
        FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_target(false)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    for (key, value) in &args.properties {
        config = config.with_property(key.as_str(), value.as_str());
    }

    let runtime = Arc::new(DumpRuntime::new(&args.runtime));
    let reconciler = Reconciler::start(&config, runtime.clone(), runtime)
        .await
        .context("Startup failed")?;
    let reconciler = Arc::new(reconciler);

    match args.command {
        Command::Serve { port } => serve(reconciler, &config, port).await,
        Command::Show { view } => show(&reconciler, &config, view).await,
    }
}

async fn serve(reconciler: Arc<Reconciler>, config: &EngineConfig, port: u16) -> Result<()> {
    let shutdown = CancellationToken::new();
    let state = ApiState::new(reconciler)
        .with_call_timeout(config.call_timeout_ms.map(Duration::from_millis))
        .with_shutdown(shutdown.clone());
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {port}"))?;
    info!("HTTP API listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
            }
            shutdown.cancel();
        })
        .await
        .context("HTTP server failed")
}

async fn show(reconciler: &Reconciler, config: &EngineConfig, view: View) -> Result<()> {
    let ctx = config.call_context();
    let feature = match view {
        View::Launch => reconciler.baseline(),
        View::Running => Arc::new(reconciler.running_feature(&ctx).await?),
        View::Upgrade => Arc::new(reconciler.drift(&ctx).await?),
        View::Runtime => reconciler.reconciled_feature(&ctx).await?,
    };

    let mut stdout = std::io::stdout().lock();
    r2f_model::io::write_feature(&feature, &mut stdout)?;
    writeln!(stdout)?;
    Ok(())
}
