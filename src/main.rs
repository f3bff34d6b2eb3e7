//! Tiny Router
//!
//! Serves the routes declared in a TOML file, or inspects how a request
//! would be resolved against them.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::request ──▶ routing::Dispatcher
//!                     (axum, layers)   (normalize path)   (exact / base-prefix)
//!                                                               │
//!     Client Response                                           ▼
//!     ◀────────────── http::response ◀──────────────── route handler(Params)
//!                                                       or not-found handler
//!
//!     config (TOML) ──▶ validation ──▶ http::handlers ──▶ frozen Dispatcher
//!     config watcher ──▶ rebuilt Dispatcher ──▶ atomic swap
//! ```

use std::path::{Path, PathBuf};

use axum::http::Method;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tiny_router::config::watcher::ConfigWatcher;
use tiny_router::config::{load_config, RouterConfig};
use tiny_router::http::report::{list_routes, resolve_report};
use tiny_router::http::HttpServer;
use tiny_router::lifecycle::signals::shutdown_on_ctrl_c;
use tiny_router::lifecycle::Shutdown;
use tiny_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "tiny-router")]
#[command(about = "Minimal HTTP request router", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured routes
    Serve {
        /// Route configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,

        /// Reload routes when the config file changes
        #[arg(long, requires = "config")]
        watch: bool,
    },
    /// List the registered routes as JSON
    Routes {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show how a request would be resolved, without invoking anything
    Resolve {
        #[arg(short, long)]
        config: PathBuf,

        /// Request method (GET, HEAD, POST, ...)
        method: String,

        /// Request path, e.g. /users/42
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            watch,
        } => serve(config, bind, watch).await,
        Commands::Routes { config } => {
            let config = load_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&list_routes(&config)?)?);
            Ok(())
        }
        Commands::Resolve {
            config,
            method,
            path,
        } => {
            let config = load_config(&config)?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let report = resolve_report(&config, &method, &path)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn serve(
    config_path: Option<PathBuf>,
    bind: Option<String>,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &config_path {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(bind) = bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("tiny-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.http.request_timeout_secs,
        redirect_trailing_slash = config.http.redirect_trailing_slash,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Keep the watcher handle alive for the lifetime of the server.
    let (config_updates, _watcher) = match (&config_path, watch) {
        (Some(path), true) => start_watcher(path)?,
        _ => {
            let (_, rx) = mpsc::unbounded_channel();
            (rx, None)
        }
    };

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(server.run(listener, config_updates, server_shutdown));

    shutdown_on_ctrl_c(&shutdown).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn start_watcher(
    path: &Path,
) -> Result<
    (
        mpsc::UnboundedReceiver<RouterConfig>,
        Option<notify::RecommendedWatcher>,
    ),
    notify::Error,
> {
    let (watcher, updates) = ConfigWatcher::new(path);
    let handle = watcher.run()?;
    Ok((updates, Some(handle)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_requires_config() {
        assert!(Cli::try_parse_from(["tiny-router", "serve", "--watch"]).is_err());

        let cli =
            Cli::try_parse_from(["tiny-router", "serve", "--watch", "-c", "routes.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { watch: true, .. }));
    }

    #[test]
    fn test_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "tiny-router",
            "resolve",
            "--config",
            "routes.toml",
            "get",
            "/users/42",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve { method, path, .. } => {
                assert_eq!(method, "get");
                assert_eq!(path, "/users/42");
            }
            _ => panic!("expected resolve"),
        }
    }
}
