//! Signed session tokens
//!
//! A token is `<session id>.<hex HMAC-SHA256(secret, session id)>`. The id
//! keys the server-side record; the signature stops clients from guessing
//! or forging ids.

use std::fmt;

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

use portal_shared::constants::SESSION_ID_BYTES;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug)]
pub enum SessionTokenError {
    #[error("Session secret must not be empty")]
    EmptySecret,
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Result<Self, SessionTokenError> {
        if secret.is_empty() {
            return Err(SessionTokenError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| SessionTokenError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Fresh random session id, hex encoded.
    pub fn generate_id() -> String {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    pub fn sign(&self, session_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        format!("{}.{}", session_id, hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns the session id when the signature matches.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (session_id, signature) = token.split_once('.')?;
        if session_id.len() != SESSION_ID_BYTES * 2
            || !session_id.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return None;
        }
        let signature = hex::decode(signature).ok()?;
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(session_id.to_string())
    }
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}
