use crate::constants::DEFAULT_PAGE_SIZE;
use crate::services::media_service::MediaService;
use sea_orm::DatabaseConnection;
use std::env;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub page_size: u64,
    pub media_root: String,
}

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub media_service: MediaService,
    pub config: Config,
}

impl Config {
    pub fn init() -> Config {
        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .expect("PORT must be a number");

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set in .env");

        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());

        Config {
            server_host,
            server_port,
            database_url,
            jwt_secret,
            page_size,
            media_root,
        }
    }
}
