// Storebooks - Web Server
// REST API over a snapshot loaded at startup

use anyhow::{Context, Result};
use std::env;
use storebooks::api::{router, AppState};
use storebooks::{EngineConfig, Snapshot};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storebooks=info")),
        )
        .init();

    println!("🚀 Starting Storebooks Web Server...");

    let snapshot = match env::var("STOREBOOKS_SNAPSHOT") {
        Ok(path) => {
            let snapshot = Snapshot::load(&path)
                .with_context(|| format!("Failed to load snapshot {}", path))?;
            println!("✅ Loaded {} records from {}", snapshot.record_count(), path);
            snapshot
        }
        Err(_) => {
            println!("⚠️  STOREBOOKS_SNAPSHOT not set, starting with an empty snapshot");
            Snapshot::default()
        }
    };

    let config = match env::var("STOREBOOKS_CONFIG") {
        Ok(path) => EngineConfig::from_file(&path)?,
        Err(_) => EngineConfig::default(),
    };

    let app = router(AppState::new(snapshot, config));

    let addr = env::var("STOREBOOKS_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("🌐 Server running on http://{}", addr);
    println!("📊 API endpoints:");
    println!("   GET /api/health");
    println!("   GET /api/dashboard");
    println!("   GET /api/sales | /api/payroll | /api/inventory | /api/ledger");
    println!("   GET /api/income-statement?start=YYYY-MM-DD&end=YYYY-MM-DD");
    println!("   GET /api/balance-sheet");
    println!("   GET /api/quality");
    println!("   PUT /api/collections/:name");
    info!(%addr, "listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
