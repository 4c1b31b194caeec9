//! touch-injector host binary.
//!
//! Runs the injector against a headless surface: every synthetic event that
//! would reach a GUI window is logged instead.  Useful for exercising client
//! scripts and for checking socket permissions on a device without starting
//! the real application.
//!
//! # Usage
//!
//! ```text
//! touch-injector [OPTIONS]
//!
//! Options:
//!   --config <PATH>          TOML config file [env: TOUCH_INJECTOR_CONFIG]
//!   --socket <PATH>          Override [listener] socket_path [env: TOUCH_INJECTOR_SOCKET]
//!   --print-default-config   Print the built-in configuration and exit
//! ```
//!
//! The log level comes from `RUST_LOG` when set, otherwise from the config
//! file's `log_level`.

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use touch_injector::application::dispatch::TargetSurface;
use touch_injector::infrastructure::diagnostics::DiagnosticsSink;
use touch_injector::infrastructure::storage::config::{
    load_config, to_toml_string, InjectorConfig,
};
use touch_injector::infrastructure::surface::HeadlessSurface;
use touch_injector::InjectorService;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Local-socket input injection service.
#[derive(Debug, Parser)]
#[command(
    name = "touch-injector",
    about = "Replays JSON input commands from a Unix socket as synthetic GUI events",
    version
)]
struct Cli {
    /// TOML configuration file.  A missing file means built-in defaults.
    #[arg(long, env = "TOUCH_INJECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Socket path, overriding the config file.
    #[arg(long, env = "TOUCH_INJECTOR_SOCKET")]
    socket: Option<PathBuf>,

    /// Print the built-in configuration as TOML and exit.
    #[arg(long)]
    print_default_config: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies command-line overrides.
    fn into_config(self) -> anyhow::Result<InjectorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => InjectorConfig::default(),
        };
        if let Some(socket) = self.socket {
            config.listener.socket_path = socket;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// The dispatcher must stay on the thread that owns the surface, so the
/// runtime is current-thread: `run_until` is awaited right here and never
/// moved to a worker.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", to_toml_string(&InjectorConfig::default())?);
        return Ok(());
    }

    let config = cli.into_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let diagnostics = Arc::new(match config.diagnostics_path() {
        Some(path) => DiagnosticsSink::open(path),
        None => DiagnosticsSink::disabled(),
    });

    let surface = Rc::new(HeadlessSurface::new(config.surface.width, config.surface.height));
    let mut service = InjectorService::from_config(
        Rc::clone(&surface) as Rc<dyn TargetSurface>,
        &config,
        diagnostics,
    );

    service
        .start()
        .with_context(|| format!("starting listener on {}", service.socket_path().display()))?;

    info!(
        "touch injector ready: socket={}, surface={}x{}",
        service.socket_path().display(),
        config.surface.width,
        config.surface.height
    );

    service
        .run_until(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received Ctrl+C, shutting down"),
                Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
            }
        })
        .await;

    info!("touch injector exited after {} accepted events", surface.accepted());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_without_config_uses_defaults() {
        // Arrange
        let cli = Cli::parse_from(["touch-injector"]);

        // Act
        let config = cli.into_config().expect("defaults");

        // Assert
        assert_eq!(config, InjectorConfig::default());
    }

    #[test]
    fn test_socket_flag_overrides_config() {
        let cli = Cli::parse_from(["touch-injector", "--socket", "/run/t.sock"]);

        let config = cli.into_config().expect("defaults plus override");

        assert_eq!(config.listener.socket_path, PathBuf::from("/run/t.sock"));
    }

    #[test]
    fn test_missing_config_file_is_not_an_error() {
        let cli = Cli::parse_from(["touch-injector", "--config", "/nonexistent-touch-dir/c.toml"]);

        assert!(cli.into_config().is_ok());
    }
}
