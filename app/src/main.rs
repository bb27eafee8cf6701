use aquapoll::config::CONFIG;
use aquapoll::station::StationObserver;
use aquapoll::store::{MemoryStore, PgStore, StationStore};
use aquapoll::{logging, models, rest};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let store: Arc<dyn StationStore> = match CONFIG.database_url() {
        Some(database_url) => {
            let conn = models::connect(database_url)
                .await
                .context("Failed connecting to database")?;
            if CONFIG.run_migrations() {
                models::run_migrations(&conn).await?;
            }
            models::check_schema(&conn).await?;
            info!("Using postgres store");
            Arc::new(PgStore::new(conn))
        }
        None => {
            warn!("DATABASE_URL is not set, readings and commands are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let observer = StationObserver::new(store);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed listening for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received ctrl-c, shutting down");
    };
    rest::dispatch_server(observer, CONFIG.bind_addr(), shutdown).await?;
    Ok(())
}
