use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::MailRecord;

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_epoch_seconds(&self) -> u64 {
        (**self).now_epoch_seconds()
    }
}

// Port that opens a dedicated session against one shard database.
#[async_trait]
pub trait ShardConnector: Send + Sync {
    async fn open(&self, db_name: &str) -> Result<Box<dyn ShardSession>, String>;
}

#[async_trait]
impl<T: ShardConnector + ?Sized> ShardConnector for Arc<T> {
    async fn open(&self, db_name: &str) -> Result<Box<dyn ShardSession>, String> {
        (**self).open(db_name).await
    }
}

// A single shard connection, owned by one dispatch call.
#[async_trait]
pub trait ShardSession: Send {
    // Look up the player id owning `account_name`; `Ok(None)` when no row matches.
    async fn find_player_id(&mut self, account_name: &str) -> Result<Option<i64>, String>;
    async fn insert_mail(&mut self, mail: &MailRecord) -> Result<(), String>;
    async fn close(self: Box<Self>);
}
