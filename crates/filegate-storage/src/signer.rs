//! HMAC-signed download URLs for backends without a native signer.
//!
//! Signed payload: `GET\n{object_key}\n{expires}` where `expires` is a unix
//! timestamp in seconds. The tag is HMAC-SHA256 over the payload, hex-encoded.
//! URL: `{base_url}/signed/{urlencoded key}?expires={ts}&signature={hex}`.

use crate::traits::{StorageError, StorageResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Route prefix the signed URLs point at.
pub const SIGNED_ROUTE_PREFIX: &str = "/signed";

#[derive(Clone)]
pub struct HmacUrlSigner {
    secret: Vec<u8>,
    base_url: String,
}

impl std::fmt::Debug for HmacUrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacUrlSigner")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HmacUrlSigner {
    pub fn new(secret: impl Into<Vec<u8>>, base_url: &str) -> Self {
        Self {
            secret: secret.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Signer with a process-local random secret.
    ///
    /// URLs stop verifying once the process restarts.
    pub fn with_random_secret(base_url: &str) -> Self {
        let mut secret = Vec::with_capacity(32);
        secret.extend_from_slice(Uuid::new_v4().as_bytes());
        secret.extend_from_slice(Uuid::new_v4().as_bytes());
        Self::new(secret, base_url)
    }

    /// Sign a GET URL for `object_key` valid for `expires_in` from now.
    pub fn sign(&self, object_key: &str, expires_in: Duration) -> String {
        let expires = SystemTime::now()
            .checked_add(expires_in)
            .unwrap_or(SystemTime::UNIX_EPOCH)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.sign_at(object_key, expires)
    }

    /// Sign a GET URL for `object_key` expiring at unix time `expires`.
    pub fn sign_at(&self, object_key: &str, expires: u64) -> String {
        let signature = hex::encode(self.tag(object_key, expires));
        format!(
            "{}{}/{}?expires={}&signature={}",
            self.base_url,
            SIGNED_ROUTE_PREFIX,
            urlencoding::encode(object_key),
            expires,
            signature
        )
    }

    /// Check a signature and its expiry against the current time.
    pub fn verify(&self, object_key: &str, expires: u64, signature: &str) -> StorageResult<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.verify_at(object_key, expires, signature, now)
    }

    pub fn verify_at(
        &self,
        object_key: &str,
        expires: u64,
        signature: &str,
        now: u64,
    ) -> StorageResult<()> {
        let tag = hex::decode(signature)
            .map_err(|_| StorageError::InvalidSignature(object_key.to_string()))?;

        let mut mac = self.mac();
        mac.update(payload(object_key, expires).as_bytes());
        mac.verify_slice(&tag)
            .map_err(|_| StorageError::InvalidSignature(object_key.to_string()))?;

        if now > expires {
            return Err(StorageError::Expired(object_key.to_string()));
        }
        Ok(())
    }

    fn tag(&self, object_key: &str, expires: u64) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload(object_key, expires).as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key size")
    }
}

fn payload(object_key: &str, expires: u64) -> String {
    format!("GET\n{}\n{}", object_key, expires)
}
