//! Tenant-bound envelope: optional compression, then AES-GCM encryption with
//! a per-nest key derived via HKDF from a master key. The nest id is
//! authenticated data, so a ciphertext decrypted under the wrong nest id
//! fails closed instead of silently returning garbage.

use crate::error::StorageError;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;

const NONCE_LEN: usize = 12;

/// Derives a per-nest 256-bit key from the master key using the nest id as
/// HKDF info, so compromising one nest's key reveals nothing about another's.
fn derive_key(master_key: &[u8], nest_id: &str) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(None, master_key);
    let mut out = [0u8; 32];
    hk.expand(nest_id.as_bytes(), &mut out)
        .expect("32 bytes is a valid HKDF output length");
    out
}

#[derive(Debug, Clone)]
pub struct Envelope {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub compressed: bool,
}

/// Payloads at or above this size are zstd-compressed before encryption.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 4096;

pub fn seal(master_key: &[u8], nest_id: &str, plaintext: &[u8], compression_threshold: usize) -> Result<Envelope, StorageError> {
    let (body, compressed) = if plaintext.len() >= compression_threshold {
        (
            zstd::stream::encode_all(plaintext, 0).map_err(|e| StorageError::Codec(e.to_string()))?,
            true,
        )
    } else {
        (plaintext.to_vec(), false)
    };

    let key_bytes = derive_key(master_key, nest_id);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: &body,
                aad: nest_id.as_bytes(),
            },
        )
        .map_err(|_| StorageError::Encryption)?;

    Ok(Envelope {
        nonce: nonce_bytes,
        ciphertext,
        compressed,
    })
}

/// Opens an envelope, verifying it was sealed for `nest_id`. The AAD binds
/// the nest id into the authentication tag, so a mismatched id fails the
/// AEAD check rather than silently decrypting under the wrong key.
pub fn open(master_key: &[u8], nest_id: &str, envelope: &Envelope) -> Result<Vec<u8>, StorageError> {
    let key_bytes = derive_key(master_key, nest_id);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let nonce = Nonce::from_slice(&envelope.nonce);

    let body = cipher
        .decrypt(
            nonce,
            Payload {
                msg: &envelope.ciphertext,
                aad: nest_id.as_bytes(),
            },
        )
        .map_err(|_| StorageError::Decryption)?;

    if envelope.compressed {
        zstd::stream::decode_all(body.as_slice()).map_err(|e| StorageError::Codec(e.to_string()))
    } else {
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_small_payload() {
        let master_key = b"0123456789abcdef0123456789abcdef";
        let sealed = seal(master_key, "acme", b"hello", DEFAULT_COMPRESSION_THRESHOLD).unwrap();
        assert!(!sealed.compressed);
        let opened = open(master_key, "acme", &sealed).unwrap();
        assert_eq!(opened, b"hello");
    }

    #[test]
    fn compresses_large_payload() {
        let master_key = b"0123456789abcdef0123456789abcdef";
        let payload = vec![b'x'; 8192];
        let sealed = seal(master_key, "acme", &payload, DEFAULT_COMPRESSION_THRESHOLD).unwrap();
        assert!(sealed.compressed);
        assert!(sealed.ciphertext.len() < payload.len());
        let opened = open(master_key, "acme", &sealed).unwrap();
        assert_eq!(opened, payload);
    }

    #[test]
    fn fails_closed_on_nest_mismatch() {
        let master_key = b"0123456789abcdef0123456789abcdef";
        let sealed = seal(master_key, "acme", b"secret", DEFAULT_COMPRESSION_THRESHOLD).unwrap();
        let result = open(master_key, "other-nest", &sealed);
        assert!(matches!(result, Err(StorageError::Decryption)));
    }
}
