//! Signed cookie sessions
//!
//! The whole session (logged-in user and pending flash messages) lives in
//! the cookie: `base64url(json) "." base64url(hmac_sha256(json))`. A cookie
//! with a bad signature or payload is treated as an empty session.

use anyhow::{Context, Result};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use data_encoding::{BASE64URL_NOPAD, HEXLOWER};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::{Arc, Mutex};

use crate::config::SessionConfig;
use crate::models::User;
use crate::theme::FlashMessage;
use crate::web::middleware::{AppState, WebError};

type HmacSha256 = Hmac<Sha256>;

/// Contents of the session cookie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<FlashMessage>,
}

/// Encodes, signs and verifies session cookies
pub struct SessionManager {
    mac: HmacSha256,
    cookie_name: String,
    max_age_secs: i64,
}

impl SessionManager {
    pub fn new(key: &[u8], cookie_name: impl Into<String>, max_age_days: i64) -> Result<Self> {
        let mac = <HmacSha256 as Mac>::new_from_slice(key)
            .map_err(|e| anyhow::anyhow!("Invalid session key: {}", e))?;
        Ok(Self {
            mac,
            cookie_name: cookie_name.into(),
            max_age_secs: max_age_days.max(0) * 24 * 60 * 60,
        })
    }

    /// Use the configured secret, or a random one when none is set.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let key = match config.secret_key.as_deref() {
            Some(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
            _ => {
                tracing::warn!("No session secret configured; sessions will not survive a restart");
                generate_secret()?.into_bytes()
            }
        };
        Self::new(&key, config.cookie_name.clone(), config.max_age_days)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Serialize and sign `data`
    pub fn encode(&self, data: &SessionData) -> Result<String> {
        let json = serde_json::to_vec(data).context("Failed to serialize session")?;
        let mut mac = self.mac.clone();
        mac.update(&json);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            BASE64URL_NOPAD.encode(&json),
            BASE64URL_NOPAD.encode(&signature)
        ))
    }

    /// Verify and deserialize a cookie value
    pub fn decode(&self, value: &str) -> Option<SessionData> {
        let (payload, signature) = value.split_once('.')?;
        let json = BASE64URL_NOPAD.decode(payload.as_bytes()).ok()?;
        let signature = BASE64URL_NOPAD.decode(signature.as_bytes()).ok()?;

        let mut mac = self.mac.clone();
        mac.update(&json);
        mac.verify_slice(&signature).ok()?;

        serde_json::from_slice(&json).ok()
    }

    /// Cookie value from a `Cookie` header
    pub fn read_cookie<'a>(&self, cookie_header: &'a str) -> Option<&'a str> {
        cookie_header
            .split(';')
            .map(str::trim)
            .find_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                (name == self.cookie_name).then_some(value)
            })
    }

    pub fn set_cookie_header(&self, value: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name, value, self.max_age_secs
        )
    }
}

fn generate_secret() -> Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("Failed to generate session secret: {}", e))?;
    Ok(HEXLOWER.encode(&bytes))
}

#[derive(Debug, Default)]
struct SessionState {
    data: SessionData,
    modified: bool,
}

/// Request-scoped session handle
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                data,
                modified: false,
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.with(|s| s.data.user_id)
    }

    pub fn username(&self) -> Option<String> {
        self.with(|s| s.data.username.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id().is_some()
    }

    pub fn login(&self, user: &User) {
        self.with(|s| {
            s.data.user_id = Some(user.id);
            s.data.username = Some(user.username.clone());
            s.modified = true;
        });
    }

    /// Drop the login and any pending messages
    pub fn clear(&self) {
        self.with(|s| {
            s.data = SessionData::default();
            s.modified = true;
        });
    }

    pub fn flash(&self, category: &str, message: impl Into<String>) {
        self.with(|s| {
            s.data.flashes.push(FlashMessage::new(category, message));
            s.modified = true;
        });
    }

    /// Pending messages; each is shown once
    pub fn take_flashes(&self) -> Vec<FlashMessage> {
        self.with(|s| {
            if s.data.flashes.is_empty() {
                return Vec::new();
            }
            s.modified = true;
            std::mem::take(&mut s.data.flashes)
        })
    }

    fn changed_data(&self) -> Option<SessionData> {
        self.with(|s| s.modified.then(|| s.data.clone()))
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| WebError::Internal("Session layer is not installed".to_string()))
    }
}

/// Load the session from the request cookie and write it back when changed
pub async fn session_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let manager = &state.sessions;
    let data = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| manager.read_cookie(cookies))
        .and_then(|value| manager.decode(value))
        .unwrap_or_default();

    let session = Session::new(data);
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let Some(data) = session.changed_data() {
        match manager.encode(&data) {
            Ok(value) => match HeaderValue::from_str(&manager.set_cookie_header(&value)) {
                Ok(cookie) => {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
                Err(e) => tracing::error!("Invalid session cookie header: {}", e),
            },
            Err(e) => tracing::error!("Failed to encode session: {:#}", e),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn manager() -> SessionManager {
        SessionManager::new(b"test-secret", "session", 31).unwrap()
    }

    fn sample() -> SessionData {
        SessionData {
            user_id: Some(7),
            username: Some("admin".to_string()),
            flashes: vec![FlashMessage::new("success", "Login successful!")],
        }
    }

    #[test]
    fn test_encode_decode() {
        let m = manager();
        let value = m.encode(&sample()).unwrap();
        assert_eq!(m.decode(&value), Some(sample()));
    }

    #[test]
    fn test_decode_rejects_other_key() {
        let value = manager().encode(&sample()).unwrap();
        let other = SessionManager::new(b"different", "session", 31).unwrap();
        assert_eq!(other.decode(&value), None);
    }

    #[test]
    fn test_decode_rejects_tampered_payload() {
        let m = manager();
        let value = m.encode(&sample()).unwrap();
        let (_, signature) = value.split_once('.').unwrap();
        let forged = BASE64URL_NOPAD.encode(br#"{"user_id":1,"username":"root"}"#);

        assert_eq!(m.decode(&format!("{}.{}", forged, signature)), None);
        assert_eq!(m.decode("garbage"), None);
        assert_eq!(m.decode(""), None);
    }

    #[test]
    fn test_read_cookie() {
        let m = manager();
        assert_eq!(m.read_cookie("a=1; session=abc.def; b=2"), Some("abc.def"));
        assert_eq!(m.read_cookie("sessionx=1"), None);
        assert_eq!(m.read_cookie(""), None);
    }

    #[test]
    fn test_set_cookie_header() {
        let header = manager().set_cookie_header("v");
        assert_eq!(
            header,
            "session=v; Path=/; HttpOnly; SameSite=Lax; Max-Age=2678400"
        );
    }

    #[test]
    fn test_session_flashes_are_taken_once() {
        let session = Session::default();
        assert!(session.changed_data().is_none());

        session.flash("info", "You have been logged out");
        assert_eq!(session.take_flashes().len(), 1);
        assert!(session.take_flashes().is_empty());
        assert!(session.changed_data().is_some());
    }

    #[test]
    fn test_login_and_clear() {
        let session = Session::default();
        let mut user = User::new("admin".into(), "a@b.c".into(), "hash".into());
        user.id = 3;

        session.login(&user);
        assert_eq!(session.user_id(), Some(3));
        assert_eq!(session.username().as_deref(), Some("admin"));

        session.clear();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_generated_secret_is_hex() {
        let secret = generate_secret().unwrap();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }

    mod property_tests {
        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(50))]

            #[test]
            fn signed_sessions_verify(
                user_id in proptest::option::of(1i64..10_000),
                username in proptest::option::of("[a-z]{1,12}"),
                message in "\\PC{0,40}",
            ) {
                let m = manager();
                let data = SessionData {
                    user_id,
                    username,
                    flashes: vec![FlashMessage::new("info", message)],
                };
                let value = m.encode(&data).unwrap();
                prop_assert_eq!(m.decode(&value), Some(data));
            }

            #[test]
            fn flipped_signature_fails(flip in 0usize..32) {
                let m = manager();
                let value = m.encode(&sample()).unwrap();
                let (payload, signature) = value.split_once('.').unwrap();
                let mut sig = BASE64URL_NOPAD.decode(signature.as_bytes()).unwrap();
                sig[flip] ^= 0x01;
                let forged = format!("{}.{}", payload, BASE64URL_NOPAD.encode(&sig));
                prop_assert_eq!(m.decode(&forged), None);
            }
        }
    }
}
