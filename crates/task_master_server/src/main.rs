use anyhow::Context;
use std::sync::Arc;
use task_master_core::storage::{self, JsonFileBackend};
use task_master_core::store::TaskStore;
use task_master_server::{config::Config, routes};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "task_master_core=debug,task_master_server=debug,tower_http=debug".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let store_path = storage::store_path()?;
    info!(path = %store_path.display(), "opening task store");
    let store = TaskStore::open(JsonFileBackend::new(&store_path))?;

    let addr = config.bind_addr();
    let state = Arc::new(routes::AppState {
        config,
        store: Mutex::new(store),
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
