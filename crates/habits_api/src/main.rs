//! Server entry point: parse flags, bring up logging and storage, serve.

use anyhow::{anyhow, Context};
use clap::Parser;
use habits_api::api::{create_router, AppState};
use habits_core::{default_log_level, init_logging, init_stderr_logging, open_db, open_db_in_memory};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "habits_api", about = "REST API for the habits tracker")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "HABITS_PORT", default_value_t = 8000)]
    port: u16,

    /// SQLite database file. Runs on an in-memory database when absent.
    #[arg(long, env = "HABITS_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Directory for rolling log files. Logs to stderr when absent.
    #[arg(long, env = "HABITS_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "HABITS_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = args
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    match &args.log_dir {
        Some(dir) => init_logging(&level, dir).map_err(|err| anyhow!(err))?,
        None => init_stderr_logging(&level).map_err(|err| anyhow!(err))?,
    }

    let conn = match &args.db_path {
        Some(path) => open_db(path).with_context(|| {
            format!("failed to open database at {}", path.display())
        })?,
        None => {
            log::warn!("event=db_open module=api status=ok mode=memory note=data_not_persisted");
            open_db_in_memory().context("failed to open in-memory database")?
        }
    };

    let router = create_router(AppState::new(conn));

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("event=server_start module=api status=ok addr={addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=shutdown_signal module=api status=error detail={err}");
    }
}
