use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use scout_assistant::assistant::ScoutAssistant;
use scout_assistant::config::ScoutConfig;
use scout_assistant::player_table::PlayerTable;
use scout_assistant::server::create_router;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut cfg = ScoutConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(path) = arg.strip_prefix("--data=") {
            cfg.data_path = PathBuf::from(path.trim());
        } else if arg == "--data" {
            if let Some(path) = iter.next() {
                cfg.data_path = PathBuf::from(path.trim());
            }
        } else if let Some(addr) = arg.strip_prefix("--bind=") {
            cfg.bind_addr = addr.trim().to_string();
        } else if arg == "--bind" {
            if let Some(addr) = iter.next() {
                cfg.bind_addr = addr.trim().to_string();
            }
        } else if arg == "--offline" {
            cfg.llm_enabled = false;
        }
    }

    // Table loading and the service check block, so they run before the runtime starts.
    let table = PlayerTable::load_csv(&cfg.data_path)?;
    let assistant = ScoutAssistant::from_config(&cfg, table);
    if assistant.is_offline() {
        eprintln!("[WARN] answer service unavailable, serving basic mode");
    }
    let app = create_router(Arc::new(assistant));

    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
            .await
            .with_context(|| format!("bind {}", cfg.bind_addr))?;
        info!("scout assistant listening on {}", cfg.bind_addr);
        axum::serve(listener, app).await.context("serve http")
    })
}
