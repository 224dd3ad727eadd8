use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ferroid::time::TimeSource;

use crate::domain::entities::MailRecord;
use crate::domain::ports::{Clock, ShardConnector, ShardSession};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

// Hand-driven millisecond clock for id allocation, counted from the id epoch.
#[derive(Clone)]
pub(crate) struct ManualTime(Arc<AtomicU64>);

impl ManualTime {
    pub(crate) fn at(millis: u64) -> Self {
        Self(Arc::new(AtomicU64::new(millis)))
    }

    pub(crate) fn set(&self, millis: u64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource<u64> for ManualTime {
    fn current_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub(crate) struct FailureFlags {
    pub connect: bool,
    pub lookup: bool,
    // Fail the insert at this zero-based position in the batch.
    pub insert_at: Option<usize>,
    // Stall the matching call for this long to exercise timeouts.
    pub connect_delay: Option<Duration>,
    pub lookup_delay: Option<Duration>,
    pub insert_delay: Option<Duration>,
}

#[derive(Default)]
struct ShardTables {
    players: HashMap<String, i64>,
    lookups: Vec<String>,
    mails: Vec<MailRecord>,
    opened: Vec<String>,
    closed: usize,
}

// In-memory shard that records every lookup and insert.
#[derive(Clone, Default)]
pub(crate) struct RecordingShard {
    tables: Arc<Mutex<ShardTables>>,
    failures: FailureFlags,
}

impl RecordingShard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn with_player(self, account_name: &str, player_id: i64) -> Self {
        self.tables
            .lock()
            .expect("shard mutex poisoned")
            .players
            .insert(account_name.to_string(), player_id);
        self
    }

    pub(crate) fn lookups(&self) -> Vec<String> {
        self.tables.lock().expect("shard mutex poisoned").lookups.clone()
    }

    pub(crate) fn mails(&self) -> Vec<MailRecord> {
        self.tables.lock().expect("shard mutex poisoned").mails.clone()
    }

    pub(crate) fn opened(&self) -> Vec<String> {
        self.tables.lock().expect("shard mutex poisoned").opened.clone()
    }

    pub(crate) fn closed(&self) -> usize {
        self.tables.lock().expect("shard mutex poisoned").closed
    }
}

#[async_trait]
impl ShardConnector for RecordingShard {
    async fn open(&self, db_name: &str) -> Result<Box<dyn ShardSession>, String> {
        if let Some(delay) = self.failures.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failures.connect {
            return Err("connection refused".to_string());
        }

        self.tables
            .lock()
            .expect("shard mutex poisoned")
            .opened
            .push(db_name.to_string());
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl ShardSession for RecordingShard {
    async fn find_player_id(&mut self, account_name: &str) -> Result<Option<i64>, String> {
        if let Some(delay) = self.failures.lookup_delay {
            tokio::time::sleep(delay).await;
        }

        let mut guard = self.tables.lock().expect("shard mutex poisoned");
        guard.lookups.push(account_name.to_string());
        if self.failures.lookup {
            return Err("lookup failed".to_string());
        }
        Ok(guard.players.get(account_name).copied())
    }

    async fn insert_mail(&mut self, mail: &MailRecord) -> Result<(), String> {
        if let Some(delay) = self.failures.insert_delay {
            tokio::time::sleep(delay).await;
        }

        let mut guard = self.tables.lock().expect("shard mutex poisoned");
        if self.failures.insert_at == Some(guard.mails.len()) {
            return Err("Duplicate entry for key 'PRIMARY'".to_string());
        }
        guard.mails.push(mail.clone());
        Ok(())
    }

    async fn close(self: Box<Self>) {
        self.tables.lock().expect("shard mutex poisoned").closed += 1;
    }
}
