use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::signal::unix::SignalKind;

use irmapper::config::{self, AppConfig};
use irmapper::error::ApiResult;
use irmapper::server::appstate::AppState;
use irmapper::server::http::{self, HttpServer};
use irmapper::server::build_service;
use irmapper::transport::Transport;
use irmapper::transport::hass::HassClient;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: Utf8PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the http api (default)
    Serve,

    /// Validate configuration and list the configured lights
    Check {
        /// Also ask Home Assistant whether each remote entity exists
        #[arg(long)]
        online: bool,
    },
}

/*
 * Formatter function to output in syslog format. This makes sense when running
 * as a service (where output might go to a log file, or the system journal)
 */
#[allow(clippy::match_same_arms)]
fn syslog_format(
    buf: &mut pretty_env_logger::env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    writeln!(
        buf,
        "<{}>{}: {}",
        match record.level() {
            log::Level::Error => 3,
            log::Level::Warn => 4,
            log::Level::Info => 6,
            log::Level::Debug => 7,
            log::Level::Trace => 7,
        },
        record.target(),
        record.args()
    )
}

fn init_logging() -> ApiResult<()> {
    /* Try to provide reasonable default filters, when RUST_LOG is not specified */
    const DEFAULT_LOG_FILTERS: &[&str] = &[
        "debug",
        "hyper=info",
        "reqwest=info",
        "tower_http::trace::on_request=info",
    ];

    let log_filters = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTERS.join(","));

    /* Detect if we need syslog or human-readable formatting */
    if std::env::var("SYSTEMD_EXEC_PID").is_ok_and(|pid| pid == std::process::id().to_string()) {
        Ok(pretty_env_logger::env_logger::builder()
            .format(syslog_format)
            .parse_filters(&log_filters)
            .try_init()?)
    } else {
        Ok(pretty_env_logger::formatted_timed_builder()
            .parse_filters(&log_filters)
            .try_init()?)
    }
}

fn hass_client(config: &AppConfig) -> ApiResult<HassClient> {
    let mut client = HassClient::new(&config.hass)?;
    client.load_token_from_env(&config.hass)?;
    Ok(client)
}

fn install_signal_handlers(handle: &axum_server::Handle) -> ApiResult<()> {
    fn shutdown(msg: &str, handle: &axum_server::Handle) {
        log::warn!("{msg}");
        let _ = std::io::stderr().flush();
        http::signal_stop(handle);
    }

    let ctrlc = handle.clone();
    tokio::spawn(async move {
        if matches!(signal::ctrl_c().await, Ok(())) {
            shutdown("Ctrl-C pressed, exiting..", &ctrlc);
        }
    });

    let term = handle.clone();
    let mut signal = signal::unix::signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        if matches!(signal.recv().await, Some(())) {
            shutdown("SIGTERM received, exiting..", &term);
        }
    });

    Ok(())
}

async fn serve(config: &AppConfig) -> ApiResult<()> {
    if !config.has_lights() {
        log::warn!("{}", "-".repeat(80));
        log::warn!("No lights configured in config!");
        log::warn!("irmapper will run, but has nothing to control.");
        log::warn!("{}", "-".repeat(80));
    }

    let transport: Arc<dyn Transport> = Arc::new(hass_client(config)?);
    let appstate = AppState::new(config, &transport);

    let server = HttpServer::http(config.server.listen, build_service(appstate));

    install_signal_handlers(&server.handle())?;

    server.run().await
}

async fn check(config: &AppConfig, online: bool) -> ApiResult<()> {
    let client = if online {
        Some(hass_client(config)?)
    } else {
        None
    };

    for light in &config.lights {
        log::info!(
            "{:?} [{}]: remote {}, {} colors, {} effects, brightness {}",
            light.name,
            light.entity_id(),
            light.broadlink_remote,
            light.colors.len(),
            light.effects.len(),
            if light.supports_brightness() { "yes" } else { "no" },
        );

        if let Some(client) = &client {
            match client.get_state(&light.broadlink_remote).await {
                Ok(state) => log::info!("  {} is {}", state.entity_id, state.state),
                Err(err) => log::error!("  {} unavailable: {err}", light.broadlink_remote),
            }
        }
    }

    log::info!("Configuration OK ({} lights)", config.lights.len());
    Ok(())
}

async fn run() -> ApiResult<()> {
    init_logging()?;

    let args = Args::parse();

    let config = config::parse(&args.config)?;
    log::debug!("Configuration loaded successfully");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::Check { online } => check(&config, online).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        log::error!("irmapper error: {err}");
        log::error!("Fatal error encountered, cannot continue.");
    }
}
