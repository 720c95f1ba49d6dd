use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    Sqlite,
    Mongodb,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub db_type: DbType,
    pub database_url: String,
    pub mongodb_uri: String,
    pub mongodb_db_name: String,
    pub api_prefix: String,
    pub log_level: String,
}

impl Config {
    /// Storage mode is read once here and stays fixed for the process lifetime.
    pub fn from_env() -> Self {
        dotenv().ok();

        let db_type = match env::var("DB_TYPE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "mongodb" => DbType::Mongodb,
            _ => DbType::Sqlite,
        };

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            db_type,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:hrms.db?mode=rwc".to_string()),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongodb_db_name: env::var("MONGODB_DB_NAME").unwrap_or_else(|_| "hrms".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
