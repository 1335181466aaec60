//! Cookie-based user identity.
//!
//! A browser is identified by one cookie holding an opaque id. Requests
//! without it (or with an empty value) get a fresh 64-hex-char id and a
//! `Set-Cookie` header carrying it back.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use smalltalk_config::GatewayConfig;
use smalltalk_core::dialog::{InvalidUserId, UserId};

/// Random bytes per generated id; hex encoding doubles the length.
const ID_BYTES: usize = 32;

/// Who is talking, and whether the browser still has to be told.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    /// `Set-Cookie` value to send back, present only for a new id.
    pub set_cookie: Option<String>,
}

impl Identity {
    /// Resolve the caller from its cookies, minting an id when needed.
    pub fn resolve(headers: &HeaderMap, config: &GatewayConfig) -> Result<Self, InvalidUserId> {
        if let Some(value) = cookie_value(headers, &config.cookie_name) {
            return Ok(Self {
                user_id: UserId::new(value)?,
                set_cookie: None,
            });
        }

        let id = generate_id();
        let set_cookie = set_cookie_header(&config.cookie_name, &id, config.secure_cookie);
        Ok(Self {
            user_id: UserId::new(id)?,
            set_cookie: Some(set_cookie),
        })
    }

    pub fn is_new(&self) -> bool {
        self.set_cookie.is_some()
    }
}

/// Find a non-empty cookie called `name` across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// 32 random bytes, hex encoded.
pub fn generate_id() -> String {
    let bytes: [u8; ID_BYTES] = rand::random();
    hex::encode(bytes)
}

pub fn set_cookie_header(name: &str, value: &str, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
