//! Tap-tempo metronome (tapmetro) - Main entry point
//!
//! Starts the button poll loop, the tempo LED loop and the HTTP API, all
//! sharing one tempo controller.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tapmetro::api::{self, AppState};
use tapmetro::config::{Config, ConfigOverrides};
use tapmetro::indicator::{run_indicator_loop, TracingIndicator};
use tapmetro::input::{keyboard, PollLoop, SystemClock, VirtualButtons};
use tapmetro::TempoController;
use tapmetro_common::config::ConfigResolver;
use tapmetro_common::events::EventBus;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for tapmetro
#[derive(Parser, Debug)]
#[command(name = "tapmetro")]
#[command(about = "Tap-tempo metronome with an HTTP tempo API")]
#[command(version)]
struct Args {
    /// Path to the TOML config file (also TAPMETRO_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "TAPMETRO_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TAPMETRO_PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "TAPMETRO_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = ConfigResolver::new("tapmetro")
        .load(args.config.as_deref())
        .context("Failed to load configuration")?;
    let config = Config::from_sources(
        toml,
        ConfigOverrides {
            host: args.host,
            port: args.port,
            log_level: args.log_level,
        },
    )
    .context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tapmetro={0},tapmetro_common={0},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tapmetro v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        "Pins: learn={} tap={} tempo_led={} tap_led={}",
        config.pins.learn, config.pins.tap, config.pins.tempo_led, config.pins.tap_led
    );

    let controller = TempoController::new(EventBus::new(100));

    // Buttons: keyboard stand-in until a GPIO panel is attached
    let buttons = VirtualButtons::default();
    // Detached: the thread ends with the process
    keyboard::spawn_keyboard_reader(buttons.clone())
        .context("Failed to start keyboard reader")?;
    let poll = PollLoop::new(controller.clone(), buttons, SystemClock, &config.input);
    let poll_task = tokio::spawn(poll.run());

    let indicator = TracingIndicator::new(&config.pins, config.indicator.pulse_ms);
    let indicator_task = tokio::spawn(run_indicator_loop(
        controller.subscribe_indicator(),
        indicator,
    ));

    let app = api::create_router(AppState::new(controller));

    info!("Starting HTTP server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    poll_task.abort();
    indicator_task.abort();

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
