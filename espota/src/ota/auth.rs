//! Challenge-response authentication
//!
//! The device sends a nonce, the client answers with its own nonce followed
//! by `hex(hash(password || nonce || cnonce))`. Both nonces are hashed as the
//! raw bytes that went over the wire, the device nonce is never hex-decoded.

use md5::Md5;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use super::protocol::{RESPONSE_AUTH_OK, RESPONSE_REQUEST_AUTH, RESPONSE_REQUEST_SHA256_AUTH};

/// Authentication requested by the device
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum AuthMethod {
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "MD5")]
    Md5,
    #[strum(serialize = "SHA256")]
    Sha256,
}

impl AuthMethod {
    /// Map the status byte sent after feature negotiation
    pub fn from_status(status: u8) -> Option<Self> {
        match status {
            RESPONSE_AUTH_OK => Some(Self::None),
            RESPONSE_REQUEST_AUTH => Some(Self::Md5),
            RESPONSE_REQUEST_SHA256_AUTH => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Length of both nonces, in bytes of hex text
    pub fn nonce_size(self) -> usize {
        match self {
            Self::None => 0,
            Self::Md5 => 32,
            Self::Sha256 => 64,
        }
    }

    /// Generate a client nonce of [Self::nonce_size] lowercase hex characters
    pub fn generate_cnonce(self) -> String {
        let mut bytes = vec![0; self.nonce_size() / 2];
        OsRng.fill_bytes(&mut bytes);

        to_hex(&bytes)
    }

    /// Compute the lowercase hex response to a challenge
    pub fn response(self, password: &str, nonce: &[u8], cnonce: &str) -> String {
        match self {
            Self::None => String::new(),
            Self::Md5 => hex_digest::<Md5>(password, nonce, cnonce),
            Self::Sha256 => hex_digest::<Sha256>(password, nonce, cnonce),
        }
    }
}

fn hex_digest<D: Digest>(password: &str, nonce: &[u8], cnonce: &str) -> String {
    let mut hasher = D::new();
    hasher.update(password.as_bytes());
    hasher.update(nonce);
    hasher.update(cnonce.as_bytes());

    to_hex(&hasher.finalize())
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
