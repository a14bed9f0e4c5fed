mod args;
mod commands;
mod config;
mod dirs;

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app_api::{AppContext, expand_home_path};
use http_api::HttpState;
use propinas_app::{AppPaths, AppState, SessionConfig, ensure_app_data_dir};

use crate::args::{Cli, Command};
use crate::commands::Target;
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let loaded = config::load_or_create().map_err(io::Error::other)?;
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| loaded.config.log_level.clone());
    init_tracing(&log_level);
    if loaded.created {
        tracing::info!(path = %loaded.paths.file.display(), "created default config");
    }

    let data_path = resolve_data_path(&cli, &loaded.config).map_err(io::Error::other)?;
    let session_config = SessionConfig {
        roster: loaded.config.roster.clone(),
        user: cli.user.clone().unwrap_or_else(|| loaded.config.user.clone()),
        sync_policy: loaded.config.sync_policy,
    };
    let target = match cli.remote.clone().or_else(|| loaded.config.remote_url.clone()) {
        Some(url) => Target::Remote(url),
        None => Target::Local(data_path.clone()),
    };

    match cli.command.unwrap_or_default() {
        Command::Serve { host } => {
            serve(data_path, host, cli.port.unwrap_or(loaded.config.port)).await
        }
        Command::Watch { interval } => {
            let interval = interval.unwrap_or(loaded.config.poll_interval_secs).max(1);
            watch(target, session_config, Duration::from_secs(interval)).await
        }
        command => {
            tokio::task::spawn_blocking(move || {
                commands::run(command, &target, session_config)
            })
            .await??;
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolve_data_path(cli: &Cli, config: &CliConfig) -> Result<PathBuf, String> {
    if let Some(path) = &cli.data_file {
        return Ok(path.clone());
    }
    if let Some(path) = &config.data_file {
        return Ok(expand_home_path(path));
    }
    Ok(AppPaths::new(dirs::data_dir()?).data_path)
}

async fn serve(
    data_path: PathBuf,
    host: IpAddr,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let paths = AppPaths::with_data_file(data_path);
    ensure_app_data_dir(&paths)?;
    let app_state = AppState::new(paths.data_path.clone());
    app_state.initialize()?;
    tracing::info!(path = %paths.data_path.display(), "using data file");

    let router = http_api::router(HttpState::new(AppContext::new(app_state)));

    let (listener, actual_port, used_fallback) = bind_port(host, port).await?;
    if used_fallback {
        tracing::warn!(
            configured = port,
            actual = actual_port,
            "configured port was unavailable"
        );
    }
    tracing::info!("server running at http://{host}:{actual_port}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn bind_port(host: IpAddr, port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::new(host, 0)).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    match tokio::net::TcpListener::bind(SocketAddr::new(host, port)).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener = tokio::net::TcpListener::bind(SocketAddr::new(host, 0)).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn watch(
    target: Target,
    config: SessionConfig,
    every: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session =
        tokio::task::spawn_blocking(move || commands::open_session(&target, config)).await??;
    commands::print_totals(&session);

    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_signal() => break,
        }
        let (returned, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = session.sync();
            (session, outcome)
        })
        .await?;
        session = returned;
        match outcome {
            Ok(outcome) if !outcome.is_unchanged() => {
                println!("+{} / -{} tickets", outcome.added, outcome.removed);
                commands::print_totals(&session);
            }
            Ok(_) => {}
            // Transient failures keep the last known state and retry next tick.
            Err(err) => tracing::warn!(error = %err, "poll failed"),
        }
    }
    // A blocking HTTP client must not be dropped on the async runtime.
    tokio::task::spawn_blocking(move || drop(session)).await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
