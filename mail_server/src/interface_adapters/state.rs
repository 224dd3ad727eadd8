use async_trait::async_trait;
use sqlx::Connection;
use sqlx::mysql::MySqlConnection;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use crate::domain::entities::{Credential, MailRecord};
use crate::domain::ports::{Clock, ShardConnector, ShardSession};
use crate::frameworks::config::{Config, DatabaseConfig};
use crate::frameworks::db;
use crate::use_cases::AllocatorRegistry;

// Application state shared by every request; nothing in it changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credential: Arc<Credential>,
    pub clock: Arc<dyn Clock>,
    pub shards: Arc<dyn ShardConnector>,
    // One allocator per shard, kept for the life of the process.
    pub allocators: Arc<AllocatorRegistry>,
}

impl AppState {
    // Production wiring: system clock and MySQL shards.
    pub fn new(config: Config) -> Self {
        let shards = MySqlShardConnector {
            database: config.database.clone(),
        };
        Self::with_adapters(config, Arc::new(SystemClock), Arc::new(shards))
    }

    pub fn with_adapters(
        config: Config,
        clock: Arc<dyn Clock>,
        shards: Arc<dyn ShardConnector>,
    ) -> Self {
        Self {
            credential: Arc::new(config.credential()),
            config: Arc::new(config),
            clock,
            shards,
            allocators: Arc::new(AllocatorRegistry::default()),
        }
    }
}

// System clock adapter used by auth and dispatch.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

// MySQL-backed shard connector; each call opens a fresh connection.
#[derive(Clone)]
pub struct MySqlShardConnector {
    pub database: DatabaseConfig,
}

#[async_trait]
impl ShardConnector for MySqlShardConnector {
    async fn open(&self, db_name: &str) -> Result<Box<dyn ShardSession>, String> {
        let options = db::shard_options(&self.database, db_name);
        let conn = db::connect_shard(&options)
            .await
            .map_err(|err| err.to_string())?;
        Ok(Box::new(MySqlShardSession { conn }))
    }
}

pub struct MySqlShardSession {
    conn: MySqlConnection,
}

#[async_trait]
impl ShardSession for MySqlShardSession {
    async fn find_player_id(&mut self, account_name: &str) -> Result<Option<i64>, String> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM player WHERE accname = ?")
            .bind(account_name)
            .fetch_optional(&mut self.conn)
            .await
            .map_err(|err| err.to_string())
    }

    async fn insert_mail(&mut self, mail: &MailRecord) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO player_mail
                (id, type, send_role_id, rec_role_id, title, content, accessory, ctime)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(mail.mail_id)
        .bind(mail.kind)
        .bind(mail.sender_id)
        .bind(mail.recipient_id)
        .bind(&mail.title)
        .bind(&mail.content)
        .bind(&mail.attachment)
        .bind(mail.created_at)
        .execute(&mut self.conn)
        .await
        .map(|_| ())
        .map_err(|err| err.to_string())
    }

    async fn close(self: Box<Self>) {
        if let Err(err) = self.conn.close().await {
            warn!(error = %err, "failed to close shard connection");
        }
    }
}
