use std::sync::Arc;
use tracing::info;

use crate::config::{Config, DbType};
use crate::error::Result;
use crate::store::{Store, mongo::MongoStore, sqlite::SqliteStore};

/// Builds the configured backend once at startup. The choice is fixed
/// for the process lifetime.
pub async fn init_store(config: &Config) -> Result<Arc<dyn Store>> {
    match config.db_type {
        DbType::Sqlite => {
            info!(url = %config.database_url, "Using SQLite backend");
            let store = SqliteStore::connect(&config.database_url).await?;
            Ok(Arc::new(store))
        }
        DbType::Mongodb => {
            info!(db = %config.mongodb_db_name, "Using MongoDB backend");
            let store = MongoStore::connect(&config.mongodb_uri, &config.mongodb_db_name).await?;
            Ok(Arc::new(store))
        }
    }
}
