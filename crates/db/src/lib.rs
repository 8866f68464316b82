pub mod models;

use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Shared handle to the sqlite pool. Runs embedded migrations on startup.
#[derive(Debug, Clone)]
pub struct DBService {
    pub pool: SqlitePool,
}

impl DBService {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!(database_url = %database_url, "database ready");

        Ok(Self { pool })
    }
}
