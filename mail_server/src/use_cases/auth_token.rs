use chrono::{DateTime, NaiveTime, Offset, TimeZone, Timelike};
use sha2::{Digest, Sha256};

// Fixed salt appended to every token digest.
const TOKEN_SALT: &str = "salt SS$*sd^&(b^er$-1fw(da)d";
// Tokens roll over at every even hour of the local day.
const WINDOW_HOURS: u32 = 2;

// Unix timestamp at which the checkpoint window containing `at` closes.
pub fn window_expiry<Tz: TimeZone>(at: &DateTime<Tz>) -> i64 {
    let checkpoint = at.hour() - at.hour() % WINDOW_HOURS;
    let expire_hour = (checkpoint + WINDOW_HOURS).min(24);

    midnight(at) + i64::from(expire_hour) * 3600
}

// Start of `at`'s calendar day in its zone. The offset in force at midnight can
// differ from `at`'s own on days the zone changes offset.
fn midnight<Tz: TimeZone>(at: &DateTime<Tz>) -> i64 {
    let local_midnight = at.date_naive().and_time(NaiveTime::MIN);
    match at.timezone().from_local_datetime(&local_midnight).earliest() {
        Some(start) => start.timestamp(),
        // Midnight skipped by a forward jump; fall back to `at`'s offset.
        None => {
            local_midnight.and_utc().timestamp() - i64::from(at.offset().fix().local_minus_utc())
        }
    }
}

pub fn compute_token<Tz: TimeZone>(user: &str, secret: &str, at: &DateTime<Tz>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.update(window_expiry(at).to_string().as_bytes());
    hasher.update(TOKEN_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

// No grace period: a token from the previous window is rejected.
pub fn is_valid<Tz: TimeZone>(candidate: &str, user: &str, secret: &str, at: &DateTime<Tz>) -> bool {
    constant_time_eq(candidate.as_bytes(), compute_token(user, secret, at).as_bytes())
}

// Compares every byte so the time taken does not depend on where inputs differ.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |diff, (l, r)| diff | (l ^ r))
        == 0
}
