// Domain layer: mail entities, error taxonomy and the ports use cases depend on.

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{
    Credential, GoodsItem, GoodsList, MailRecord, MailRequest, ParsedBatch, RecipientBatch,
};
pub use errors::{AuthError, DispatchError};
pub use ports::{Clock, ShardConnector, ShardSession};
