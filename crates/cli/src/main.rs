use std::time::Duration;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "wagate", about = "wagate — WhatsApp HTTP gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway and the session client.
    Serve {
        /// Bind address; falls back to the config value.
        #[arg(long)]
        bind: Option<String>,

        /// TCP port; falls back to the PORT env var, then the config value.
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "wagate starting");

    match cli.command {
        Commands::Serve { bind, port } => serve(bind, port).await,
    }
}

async fn serve(bind: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = wagate_config::discover_and_load();

    let bind = bind.unwrap_or_else(|| config.gateway.bind.clone());
    let port = port.unwrap_or(config.gateway.port);

    let fetcher = wagate_media::Fetcher::new(
        Duration::from_secs(config.media.fetch_timeout_secs),
        config.media.max_fetch_mb * 1024 * 1024,
    )?;

    let (session, events) = wagate_session::connect(&config.session).await?;
    tokio::spawn(wagate_session::events::log_events(events));

    let state = wagate_gateway::state::GatewayState::new(session, fetcher);
    wagate_gateway::server::serve(
        &bind,
        port,
        config.gateway.body_limit_mb * 1024 * 1024,
        state,
    )
    .await
}
