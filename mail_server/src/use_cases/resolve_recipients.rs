use std::time::Duration;

use crate::domain::errors::DispatchError;
use crate::domain::ports::ShardSession;
use crate::use_cases::deadline::bounded;

// Maps account names to player ids, one lookup per name, in order.
pub struct RecipientResolver {
    pub query_timeout: Duration,
}

impl RecipientResolver {
    // `accounts` is the operator's original text, quoted back on a miss.
    // The first unresolved name aborts; later names are never looked up.
    pub async fn resolve(
        &self,
        session: &mut dyn ShardSession,
        names: &[String],
        accounts: &str,
    ) -> Result<Vec<i64>, DispatchError> {
        let mut player_ids = Vec::with_capacity(names.len());

        for name in names {
            let found = bounded(
                "player lookup",
                self.query_timeout,
                session.find_player_id(name),
            )
            .await?
            .map_err(|reason| DispatchError::LookupFailed {
                name: name.clone(),
                reason,
            })?;

            match found {
                Some(player_id) => player_ids.push(player_id),
                None => {
                    return Err(DispatchError::AccountNotFound {
                        name: name.clone(),
                        accounts: accounts.to_string(),
                    });
                }
            }
        }

        Ok(player_ids)
    }
}
