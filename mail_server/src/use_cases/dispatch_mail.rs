use std::fmt;
use std::time::Duration;

use ferroid::time::{MonotonicClock, TimeSource};
use tracing::{info, warn};

use crate::domain::entities::{MailRecord, MailRequest, RecipientBatch};
use crate::domain::errors::DispatchError;
use crate::domain::ports::{Clock, ShardConnector, ShardSession};
use crate::use_cases::batch_parser::{parse_account_names, parse_goods, parse_shard_id};
use crate::use_cases::deadline::bounded;
use crate::use_cases::mail_id::{AllocatorError, AllocatorRegistry};
use crate::use_cases::resolve_recipients::RecipientResolver;

// What the operator sees after submitting a batch.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent(usize),
    Failed(DispatchError),
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Sent(count) => write!(f, "success {count}"),
            DispatchOutcome::Failed(err) => write!(f, "{err}"),
        }
    }
}

// Deadlines for the blocking shard calls.
#[derive(Clone, Copy, Debug)]
pub struct DispatchTimeouts {
    pub connect: Duration,
    pub query: Duration,
}

// Mail dispatch use case with injected dependencies.
pub struct DispatchMailUseCase<'a, C, S, M = MonotonicClock>
where
    M: TimeSource<u64>,
{
    pub clock: C,
    pub shards: S,
    pub allocators: &'a AllocatorRegistry<M>,
    pub timeouts: DispatchTimeouts,
}

impl<C, S, M> DispatchMailUseCase<'_, C, S, M>
where
    C: Clock,
    S: ShardConnector,
    M: TimeSource<u64> + Clone + Send + Sync + 'static,
{
    pub async fn execute(&self, request: &MailRequest) -> DispatchOutcome {
        match self.dispatch(request).await {
            Ok(sent) => DispatchOutcome::Sent(sent),
            Err(err) => DispatchOutcome::Failed(err),
        }
    }

    async fn dispatch(&self, request: &MailRequest) -> Result<usize, DispatchError> {
        let shard_id = parse_shard_id(&request.server_id)?;
        if request.db_name.is_empty() {
            return Err(DispatchError::MissingTarget);
        }

        let mut session = bounded(
            "db connect",
            self.timeouts.connect,
            self.shards.open(&request.db_name),
        )
        .await?
        .map_err(DispatchError::Connection)?;

        let result = self.send_batch(session.as_mut(), shard_id, request).await;
        session.close().await;
        result
    }

    async fn send_batch(
        &self,
        session: &mut dyn ShardSession,
        shard_id: i64,
        request: &MailRequest,
    ) -> Result<usize, DispatchError> {
        let account_names = parse_account_names(&request.acc_names)?;
        let resolver = RecipientResolver {
            query_timeout: self.timeouts.query,
        };
        let player_ids = resolver
            .resolve(session, &account_names, &request.acc_names)
            .await?;
        let batch = RecipientBatch {
            shard_id,
            account_names,
            player_ids,
        };

        let attachment = parse_goods(&request.goods)?.render();

        // A shard that ran out of sequence numbers waits for the next tick; cap that wait.
        let mail_ids = bounded(
            "id allocation",
            self.timeouts.query,
            self.allocators.allocate(batch.shard_id, batch.player_ids.len()),
        )
        .await?
        .map_err(|err| match err {
            AllocatorError::ShardOutOfRange(_) => DispatchError::ShardOutOfRange { shard_id },
            AllocatorError::Generator(reason) => DispatchError::IdAllocation(reason),
        })?;

        let mut sent = 0;
        for (mail_id, recipient_id) in mail_ids.into_iter().zip(batch.player_ids.iter().copied()) {
            let record = MailRecord::system(
                mail_id,
                recipient_id,
                &request.title,
                &request.content,
                &attachment,
                self.clock.now_epoch_seconds() as i64,
            );

            let inserted = bounded("mail insert", self.timeouts.query, session.insert_mail(&record))
                .await
                .and_then(|result| result.map_err(DispatchError::Persistence));
            if let Err(err) = inserted {
                // Rows already written stay; the operator only sees this error.
                warn!(
                    shard_id,
                    db_name = %request.db_name,
                    sent,
                    remaining = batch.player_ids.len() - sent,
                    error = %err,
                    "mail batch aborted"
                );
                return Err(err);
            }
            sent += 1;
        }

        info!(
            shard_id,
            db_name = %request.db_name,
            accounts = ?batch.account_names,
            goods = %attachment,
            title = %request.title,
            sent,
            "mail batch sent"
        );
        Ok(sent)
    }
}
