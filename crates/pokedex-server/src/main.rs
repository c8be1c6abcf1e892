//! Pokedex server - HTTP front end for the pokedex-core pipeline
//!
//! Loads configuration, installs the tracing subscriber, then serves the
//! lookup routes until Ctrl-C or SIGTERM.

mod cli;
mod config;
mod error;
mod logging;
mod routes;

use cli::Cli;
use config::Config;
use error::{Error, Result};
use logging::LoggingConfig;
use pokedex_core::Pokedex;
use routes::{create_router, AppState};
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    // Values from .env never override the real environment
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let use_color = cli.use_color();

    // Set up colored output
    colored::control::set_override(use_color);

    if let Err(e) = run(cli).await {
        eprintln!("{}", error::format_error(&e, use_color));
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    if cli.check_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // Held until exit so buffered file output is flushed
    let _guard = init_logging(&cli, &config)?;

    let pokedex = Pokedex::from_config(&config.upstream)?;
    let state = AppState {
        pokedex: Arc::new(pokedex),
    };
    let app = create_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        pokeapi = %config.upstream.pokeapi_url,
        translator = %config.upstream.translator_url,
        locale = %config.upstream.locale,
        version = pokedex_core::VERSION,
        "Pokedex server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    tracing::info!("Pokedex server stopped");
    Ok(())
}

/// Resolve configuration: file, then environment, then flags
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_with_file(cli.config.as_deref())?;
    config.merge_with_env()?;

    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Initialize the logging system
fn init_logging(
    cli: &Cli,
    config: &Config,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let mut logging_config = LoggingConfig::from_settings(&config.logging, cli.verbosity_level());
    logging_config.color = cli.use_color();

    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

/// Resolves on Ctrl-C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
