use chrono::{DateTime, Local, Utc};

use crate::domain::entities::Credential;
use crate::domain::errors::AuthError;
use crate::domain::ports::Clock;
use crate::use_cases::auth_token::{compute_token, is_valid};

// Client-side lifetime hint for the auth cookie (in seconds).
pub const AUTH_COOKIE_TTL_SECONDS: u64 = 2 * 60 * 60;

// Token handed back after a successful credential check.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub cookie_expires_at: u64,
}

// Operator gate with injected clock; windows follow the server's local time zone.
pub struct OperatorAuthUseCase<'a, C> {
    pub clock: C,
    pub credential: &'a Credential,
}

impl<C> OperatorAuthUseCase<'_, C>
where
    C: Clock,
{
    pub fn login(&self, user: &str, password: &str) -> Result<IssuedToken, AuthError> {
        if user != self.credential.user || password != self.credential.secret {
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.clock.now_epoch_seconds();
        let at = local_time(now).ok_or(AuthError::InvalidCredentials)?;

        Ok(IssuedToken {
            token: compute_token(&self.credential.user, &self.credential.secret, &at),
            cookie_expires_at: now + AUTH_COOKIE_TTL_SECONDS,
        })
    }

    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        let at = local_time(self.clock.now_epoch_seconds()).ok_or(AuthError::InvalidToken)?;

        if is_valid(token, &self.credential.user, &self.credential.secret, &at) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

fn local_time(epoch_seconds: u64) -> Option<DateTime<Local>> {
    let seconds = i64::try_from(epoch_seconds).ok()?;
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|at| at.with_timezone(&Local))
}
