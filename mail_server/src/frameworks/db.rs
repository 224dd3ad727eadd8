use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};

use crate::frameworks::config::DatabaseConfig;

// Connection options for one shard schema on the configured MySQL host.
pub fn shard_options(database: &DatabaseConfig, db_name: &str) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&database.host)
        .port(database.port)
        .username(&database.user)
        .password(&database.password)
        .database(db_name)
        .charset("utf8mb4")
}

// Open a dedicated, unpooled connection for a single dispatch.
pub async fn connect_shard(options: &MySqlConnectOptions) -> Result<MySqlConnection, sqlx::Error> {
    MySqlConnection::connect_with(options).await
}
