//! Shard-scoped, time-ordered mail identifiers.
//!
//! Ids are snowflakes generated by `ferroid` with this layout:
//!
//! ```text
//! | 1 bit: reserved | 39 bits: 10 ms ticks since 2014-09-01 | 16 bits: shard | 8 bits: sequence |
//! ```
//!
//! The time component leads, so ids stay ordered after rows written by older
//! tools against the same tables. Within one shard ids are strictly increasing.
//! Two generators only avoid collisions when their shard ids differ, so a
//! process keeps exactly one generator per shard in an [`AllocatorRegistry`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ferroid::define_snowflake_id;
use ferroid::futures::SnowflakeGeneratorAsyncTokioExt;
use ferroid::generator::LockSnowflakeGenerator;
use ferroid::time::{MonotonicClock, TimeSource};
use thiserror::Error;
use tokio::sync::Mutex;

/// Start of the id time component (2014-09-01T00:00:00Z).
pub const ID_EPOCH: Duration = Duration::from_millis(1_409_529_600_000);
/// Width of one time tick.
pub const TICK_MILLIS: u64 = 10;

const MAX_SHARD: i64 = u16::MAX as i64;

define_snowflake_id!(
    MailId, u64,
    reserved: 1,
    timestamp: 39,
    machine_id: 16,
    sequence: 8
);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocatorError {
    #[error("shard id {0} is outside 0..=65535")]
    ShardOutOfRange(i64),
    #[error("id generator failed: {0}")]
    Generator(String),
}

/// Turns a millisecond clock into 10 ms ticks that never move backwards.
///
/// A clock stepped back is held at the last tick it reported, so the generator
/// keeps drawing sequence numbers from that tick instead of waiting for the
/// wall clock to catch up.
pub(crate) struct TickClock<S> {
    millis: S,
    high_water: AtomicU64,
}

impl<S> TickClock<S> {
    pub(crate) fn new(millis: S) -> Self {
        Self {
            millis,
            high_water: AtomicU64::new(0),
        }
    }
}

impl<S: TimeSource<u64>> TimeSource<u64> for TickClock<S> {
    // Ticks, not milliseconds; the generator only compares and stores them.
    fn current_millis(&self) -> u64 {
        let tick = self.millis.current_millis() / TICK_MILLIS;
        self.high_water.fetch_max(tick, Ordering::AcqRel).max(tick)
    }
}

type ShardGenerator<S> = LockSnowflakeGenerator<MailId, TickClock<S>>;

/// Long-lived generators, one per shard, created on first use.
///
/// The map lock is only held to look a generator up; allocation runs on the
/// shard's own generator, so a slow shard never holds up the others.
pub struct AllocatorRegistry<S = MonotonicClock>
where
    S: TimeSource<u64>,
{
    time: S,
    shards: Mutex<HashMap<u16, Arc<ShardGenerator<S>>>>,
}

impl Default for AllocatorRegistry<MonotonicClock> {
    fn default() -> Self {
        Self::new(MonotonicClock::with_epoch(ID_EPOCH))
    }
}

impl<S> AllocatorRegistry<S>
where
    S: TimeSource<u64> + Clone + Send + Sync + 'static,
{
    /// `time` reports milliseconds since [`ID_EPOCH`].
    pub fn new(time: S) -> Self {
        Self {
            time,
            shards: Mutex::new(HashMap::new()),
        }
    }

    /// Returns exactly `count` strictly increasing ids for `shard_id`,
    /// waiting whenever the current tick runs out of sequence numbers.
    ///
    /// # Errors
    ///
    /// [`AllocatorError::ShardOutOfRange`] when the shard does not fit the
    /// 16-bit discriminator, [`AllocatorError::Generator`] when the generator
    /// itself fails.
    pub async fn allocate(&self, shard_id: i64, count: usize) -> Result<Vec<u64>, AllocatorError> {
        let shard = validate_shard(shard_id)?;
        let generator = self.generator(shard).await;

        let mut ids = Vec::with_capacity(count);
        while ids.len() < count {
            let id = generator
                .as_ref()
                .try_next_id_async()
                .await
                .map_err(|err| AllocatorError::Generator(format!("{err:?}")))?;
            ids.push(id.to_raw());
        }
        Ok(ids)
    }

    async fn generator(&self, shard: u16) -> Arc<ShardGenerator<S>> {
        let mut shards = self.shards.lock().await;
        shards
            .entry(shard)
            .or_insert_with(|| {
                Arc::new(LockSnowflakeGenerator::new(
                    u64::from(shard),
                    TickClock::new(self.time.clone()),
                ))
            })
            .clone()
    }
}

/// Shard component of an id.
pub fn shard_of(id: u64) -> u16 {
    MailId::from_raw(id).machine_id() as u16
}

fn validate_shard(shard_id: i64) -> Result<u16, AllocatorError> {
    if (0..=MAX_SHARD).contains(&shard_id) {
        Ok(shard_id as u16)
    } else {
        Err(AllocatorError::ShardOutOfRange(shard_id))
    }
}
