mod config;
mod constants;
mod entities;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod seeders;
mod services;
mod utils;

use config::{AppState, Config};
use dotenvy::dotenv;
use sea_orm::Database;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use crate::services::media_service::MediaService;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = Config::init();
    println!("🚀 Starting CookingCrafts Backend...");

    // 1. Database Connection
    println!("📡 Connecting to Database...");
    let db = Database::connect(&cfg.database_url)
        .await
        .expect("🔥 Failed to connect to Database!");
    println!("✅ Database Connected!");

    // 2. Catalog Seeding
    println!("🌱 Running Seeders...");
    if let Err(e) = seeders::run_seeders(&db).await {
        tracing::error!("❌ Seeding failed: {}", e);
    } else {
        println!("✅ Seeding Successful!");
    }

    // 3. Media Storage
    let media_service = MediaService::new(&cfg.media_root);

    // 4. Build App State
    let state = AppState {
        db: std::sync::Arc::new(db),
        media_service,
        config: cfg.clone(),
    };

    // 5. Initialize Router
    let app = routes::create_routes(state.clone()).with_state(state);

    // 6. Start Server
    let addr_str = format!("{}:{}", cfg.server_host, cfg.server_port);
    let addr: SocketAddr = addr_str.parse().expect("Invalid address");

    println!("🎯 Server ready! Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
