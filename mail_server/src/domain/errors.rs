use thiserror::Error;

// Operator authentication failures. Both map to 401 at the HTTP edge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid operator credentials")]
    InvalidCredentials,
    #[error("invalid auth token")]
    InvalidToken,
}

// Failures of a mail dispatch. The Display text is what the operator sees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Server ID is not integer")]
    InvalidShardId,
    #[error("dbName is empty")]
    MissingTarget,
    #[error("db connection error {0}")]
    Connection(String),
    #[error("empty accnames")]
    EmptyRecipients,
    #[error("accname not found {accounts} one: {name}")]
    AccountNotFound { name: String, accounts: String },
    #[error("accname lookup failed for {name}: {reason}")]
    LookupFailed { name: String, reason: String },
    #[error("check goods List {goods}")]
    MalformedGoods { goods: String },
    #[error("Server ID {shard_id} is out of range")]
    ShardOutOfRange { shard_id: i64 },
    #[error("mail id allocation failed: {0}")]
    IdAllocation(String),
    #[error("{0}")]
    Persistence(String),
    #[error("{operation} timed out after {after_ms}ms")]
    Timeout {
        operation: &'static str,
        after_ms: u128,
    },
}
