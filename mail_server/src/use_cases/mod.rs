// Use cases layer: operator auth and the mail dispatch pipeline.

pub mod auth_token;
pub mod batch_parser;
mod deadline;
pub mod dispatch_mail;
pub mod mail_id;
pub mod operator_auth;
pub mod resolve_recipients;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch_mail::{DispatchMailUseCase, DispatchOutcome, DispatchTimeouts};
pub use mail_id::AllocatorRegistry;
pub use operator_auth::{IssuedToken, OperatorAuthUseCase};
pub use resolve_recipients::RecipientResolver;
