use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::interface_adapters::state::AppState;
use crate::use_cases::operator_auth::{AUTH_COOKIE_TTL_SECONDS, IssuedToken, OperatorAuthUseCase};

pub const AUTH_COOKIE: &str = "auth";
pub const BASIC_CHALLENGE: &str = r#"Basic realm="Restricted""#;

/// Gate every dashboard request behind the operator credential.
///
/// A valid `auth` cookie for the current window passes straight through.
/// Otherwise HTTP Basic credentials are checked and, on success, a fresh
/// cookie is attached to the response. Anything else gets a Basic challenge.
pub async fn require_operator(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let gate = OperatorAuthUseCase {
        clock: state.clock.clone(),
        credential: state.credential.as_ref(),
    };

    let cookie_ok = auth_cookie(req.headers()).is_some_and(|token| gate.verify(token).is_ok());
    if cookie_ok {
        return next.run(req).await;
    }

    let Some((user, password)) = basic_credentials(req.headers()) else {
        return challenge();
    };

    match gate.login(&user, &password) {
        Ok(issued) => {
            let cookie = auth_cookie_header(&issued);
            let mut response = next.run(req).await;
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(err) => debug!(error = %err, "auth cookie is not a valid header value"),
            }
            response
        }
        Err(err) => {
            debug!(error = %err, user = %user, "operator login rejected");
            challenge()
        }
    }
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, BASIC_CHALLENGE)],
        "Unauthorized",
    )
        .into_response()
}

// First `auth=` pair across all Cookie headers.
fn auth_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim())
}

// The Basic scheme is case-insensitive; the password may itself contain ':'.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn auth_cookie_header(issued: &IssuedToken) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE}={}; Path=/; Max-Age={AUTH_COOKIE_TTL_SECONDS}; HttpOnly",
        issued.token
    );
    let expires = i64::try_from(issued.cookie_expires_at)
        .ok()
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0));
    if let Some(expires) = expires {
        cookie.push_str(&format!(
            "; Expires={}",
            expires.format("%a, %d %b %Y %H:%M:%S GMT")
        ));
    }
    cookie
}
