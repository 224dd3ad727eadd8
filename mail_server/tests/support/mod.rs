// Shared primitives for one-time server bootstrapping across integration tests.
use async_trait::async_trait;
use chrono::{Local, TimeZone};
use mail_server::domain::{Clock, MailRecord, ShardConnector, ShardSession};
use mail_server::{AppState, Config};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

pub const OPERATOR_USER: &str = "admin";
pub const OPERATOR_PASSWORD: &str = "hunter2";

const CONFIG: &str = r#"
    listen_addr = "127.0.0.1:0"

    [database]
    host = "127.0.0.1"
    user = "game"
    connect_timeout_ms = 1000
    query_timeout_ms = 1000

    [operator]
    user = "admin"
    password = "hunter2"
"#;

// Handles the tests use to drive the running server.
pub struct TestServer {
    pub base_url: String,
    pub clock: Arc<SettableClock>,
    pub shard: MemoryShard,
}

static SERVER: OnceLock<TestServer> = OnceLock::new();

// Epoch seconds for a wall-clock time on 2026-01-15 in the server's local zone.
pub fn local_epoch(h: u32, mi: u32, s: u32) -> u64 {
    Local
        .with_ymd_and_hms(2026, 1, 15, h, mi, s)
        .earliest()
        .expect("local time should exist")
        .timestamp() as u64
}

// Ensure the test server is running and return its handles.
pub fn ensure_server() -> &'static TestServer {
    SERVER.get_or_init(|| {
        let clock = Arc::new(SettableClock::new(local_epoch(10, 30, 0)));
        let shard = MemoryShard::default()
            .with_player("alice", 101)
            .with_player("bob", 102)
            .with_player("carol", 103);

        let config = Config::from_toml(CONFIG).expect("test config should parse");
        let state = AppState::with_adapters(config, clock.clone(), Arc::new(shard.clone()));

        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                mail_server::run(listener, state).await.expect("server failed");
            });
        });

        TestServer {
            base_url: wait_for_server_url_and_readiness(published_url),
            clock,
            shard,
        }
    })
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) -> String {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return base_url;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

// Clock the tests can move across token windows.
pub struct SettableClock(AtomicU64);

impl SettableClock {
    pub fn new(epoch_seconds: u64) -> Self {
        Self(AtomicU64::new(epoch_seconds))
    }

    pub fn set(&self, epoch_seconds: u64) {
        self.0.store(epoch_seconds, Ordering::SeqCst);
    }
}

impl Clock for SettableClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct Tables {
    players: HashMap<String, i64>,
    mails: Vec<MailRecord>,
}

// In-memory stand-in for a shard's `player` and `player_mail` tables.
#[derive(Clone, Default)]
pub struct MemoryShard {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryShard {
    pub fn with_player(self, account_name: &str, player_id: i64) -> Self {
        self.tables
            .lock()
            .expect("shard mutex poisoned")
            .players
            .insert(account_name.to_string(), player_id);
        self
    }

    pub fn mails_to(&self, player_id: i64) -> Vec<MailRecord> {
        self.tables
            .lock()
            .expect("shard mutex poisoned")
            .mails
            .iter()
            .filter(|mail| mail.recipient_id == player_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ShardConnector for MemoryShard {
    async fn open(&self, _db_name: &str) -> Result<Box<dyn ShardSession>, String> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl ShardSession for MemoryShard {
    async fn find_player_id(&mut self, account_name: &str) -> Result<Option<i64>, String> {
        let tables = self.tables.lock().expect("shard mutex poisoned");
        Ok(tables.players.get(account_name).copied())
    }

    async fn insert_mail(&mut self, mail: &MailRecord) -> Result<(), String> {
        let mut tables = self.tables.lock().expect("shard mutex poisoned");
        if tables.mails.iter().any(|existing| existing.mail_id == mail.mail_id) {
            return Err(format!("Duplicate entry '{}' for key 'PRIMARY'", mail.mail_id));
        }
        tables.mails.push(mail.clone());
        Ok(())
    }

    async fn close(self: Box<Self>) {}
}
