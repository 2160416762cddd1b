//! padlink - WebSocket bridge for phone controller apps
//!
//! Serves one controller client at a time and exposes its widgets, queued
//! commands and monitor output to an interactive host console.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padlink::cli;
use padlink::config::{AppConfig, ConfigWatcher};
use padlink::dispatcher::{DispatcherActor, DispatcherHandle, ProtocolDispatcher};
use padlink::network::{AddressSource, NetworkInfo};
use padlink::paths::AppPaths;
use padlink::transport::{self, PeerRegistry, ServerHandle};

/// padlink - bridge a phone controller app to a host console over WebSocket
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to the detected app directory)
    #[arg(short, long, env = "PADLINK_CONFIG")]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Override the configured listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the address clients should connect to, then exit
    #[arg(long)]
    print_address: bool,

    /// Run without the interactive console
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let (config_path, logs_dir) = resolve_paths(&args)?;
    let boot_config = AppConfig::load(&config_path).await?;

    if args.print_address {
        let network = NetworkInfo::new(
            boot_config.device.hostname.clone(),
            boot_config.device.address.clone(),
        );
        let port = args.port.unwrap_or(boot_config.server.port);
        println!("ws://{}:{}{}", network.current_address(), port, boot_config.server.path);
        return Ok(());
    }

    let _log_guard = init_logging(&args.log_level, &boot_config, &logs_dir)?;

    info!("Starting padlink v{}...", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", config_path);

    let (config_watcher, initial_config) = ConfigWatcher::new(config_path.clone()).await?;
    info!("Configuration loaded successfully with hot-reload enabled");

    let mut config = (*initial_config).clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    run_app(args, config, config_watcher, shutdown_signal()).await?;

    info!("padlink shutdown complete");
    Ok(())
}

async fn run_app(
    args: Args,
    mut config: AppConfig,
    mut config_watcher: ConfigWatcher,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    let network = Arc::new(NetworkInfo::new(
        config.device.hostname.clone(),
        config.device.address.clone(),
    ));
    info!(
        "Clients connect to ws://{}:{}{}",
        network.current_address(),
        config.server.port,
        config.server.path
    );

    let registry = Arc::new(PeerRegistry::new());
    let dispatcher = DispatcherActor::spawn(ProtocolDispatcher::new(
        registry.clone(),
        network.clone(),
    ));

    let server = transport::serve(config.ws_server_config(), registry, dispatcher.clone()).await?;

    let mut console = (!args.headless).then(|| spawn_console(dispatcher.clone()));

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            result = wait_console(&mut console) => {
                match result {
                    Ok(Ok(())) => info!("Console closed"),
                    Ok(Err(e)) => warn!("Console failed: {:#}", e),
                    Err(e) => warn!("Console task panicked: {}", e),
                }
                break;
            }

            Some(new_config) = config_watcher.next_config() => {
                apply_reload(&mut config, new_config, args.port, &network, &server);
            }
        }
    }

    info!("Shutting down...");
    if tokio::time::timeout(Duration::from_secs(5), server.shutdown())
        .await
        .is_err()
    {
        warn!("WebSocket server did not stop in time");
    }
    Ok(())
}

fn spawn_console(dispatcher: DispatcherHandle) -> JoinHandle<Result<()>> {
    let runtime = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || cli::run_repl(dispatcher, runtime))
}

async fn wait_console(
    console: &mut Option<JoinHandle<Result<()>>>,
) -> Result<Result<()>, tokio::task::JoinError> {
    match console.as_mut() {
        Some(task) => task.await,
        None => std::future::pending().await,
    }
}

/// Apply what can change at runtime; the listener itself needs a restart
fn apply_reload(
    current: &mut AppConfig,
    mut new: AppConfig,
    port_override: Option<u16>,
    network: &NetworkInfo,
    server: &ServerHandle,
) {
    if let Some(port) = port_override {
        new.server.port = port;
    }

    if current.server_changed(&new) {
        warn!("Server settings changed; restart padlink to apply them");
    }
    if current.device.hostname != new.device.hostname {
        warn!("Hostname changed; restart padlink to apply it");
    }
    if current.device.address != new.device.address {
        network.set_address_override(new.device.address.clone());
        info!("Reported address is now {}", network.current_address());
    }
    if current.auth != new.auth {
        server.set_authorization(new.authorization_header());
    }

    *current = new;
}

/// Config file and logs directory, from `--config` or the detected app paths
fn resolve_paths(args: &Args) -> Result<(String, PathBuf)> {
    match &args.config {
        Some(path) => {
            let logs_dir = Path::new(path)
                .parent()
                .map(|p| p.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"));
            Ok((path.clone(), logs_dir))
        },
        None => {
            let paths = AppPaths::detect();
            paths
                .ensure_directories()
                .context("Failed to prepare application directories")?;
            Ok((paths.config.to_string_lossy().to_string(), paths.logs_dir))
        },
    }
}

fn init_logging(level: &str, config: &AppConfig, logs_dir: &Path) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (file_layer, guard) = match config.logging.as_ref().filter(|l| l.file) {
        Some(logging) => {
            let dir = logging.directory.clone().unwrap_or_else(|| logs_dir.to_path_buf());
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create logs directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "padlink.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        },
    }
}
