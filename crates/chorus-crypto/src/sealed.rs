//! Sealed-box encryption between two registered agents.
//!
//! A blob is `nonce(24) ∥ ciphertext+tag(16)` under XChaCha20-Poly1305,
//! keyed by the BLAKE3-stretched X25519 shared secret of the two parties.
//! The shared secret is symmetric, so one primitive serves both directions
//! of a conversation: the sender seals with (their secret, recipient
//! public) and the recipient opens with (sender public, their secret).

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use crate::exchange::{ExchangePublicKey, ExchangeSecretKey};

/// Nonce length, in bytes (XChaCha20's 192-bit nonce).
pub const NONCE_LEN: usize = 24;

/// Poly1305 authentication tag length, in bytes.
pub const TAG_LEN: usize = 16;

/// Per-message transport budget, in bytes. A sealed blob never exceeds this.
pub const TRANSPORT_BUDGET: usize = 1_024;

/// Largest plaintext that fits the transport budget.
pub const MAX_PLAINTEXT_LEN: usize = TRANSPORT_BUDGET - NONCE_LEN - TAG_LEN;

/// Failures from sealing and opening.
///
/// `Rejected` deliberately carries no detail: a tampered blob, a truncated
/// blob, and a wrong key are indistinguishable to the caller.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SealError {
    #[error("plaintext of {len} bytes exceeds the {max}-byte budget")]
    PlaintextTooLong { len: usize, max: usize },

    #[error("blob rejected")]
    Rejected,
}

/// Seal `plaintext` for `recipient`, authenticated as the holder of `sender`.
///
/// Generates a fresh random nonce per call; sealing the same plaintext twice
/// produces different blobs. Fails rather than truncates when the plaintext
/// exceeds [`MAX_PLAINTEXT_LEN`].
pub fn seal(
    plaintext: &[u8],
    recipient: &ExchangePublicKey,
    sender: &ExchangeSecretKey,
) -> Result<Vec<u8>, SealError> {
    if plaintext.len() > MAX_PLAINTEXT_LEN {
        return Err(SealError::PlaintextTooLong {
            len: plaintext.len(),
            max: MAX_PLAINTEXT_LEN,
        });
    }

    let cipher = XChaCha20Poly1305::new((&conversation_key(sender, recipient)).into());

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| SealError::Rejected)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a blob sealed by `sender` for the holder of `recipient`.
///
/// Any tamper, truncation, or key mismatch fails with [`SealError::Rejected`].
pub fn open(
    blob: &[u8],
    sender: &ExchangePublicKey,
    recipient: &ExchangeSecretKey,
) -> Result<Vec<u8>, SealError> {
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(SealError::Rejected);
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let cipher = XChaCha20Poly1305::new((&conversation_key(recipient, sender)).into());

    cipher
        .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| SealError::Rejected)
}

/// Stretch the raw X25519 shared secret into the AEAD key.
///
/// The DH output is symmetric in its arguments, so both directions of a
/// conversation derive the same key.
fn conversation_key(own: &ExchangeSecretKey, peer: &ExchangePublicKey) -> [u8; 32] {
    blake3::derive_key("chorus-seal-v1", &own.shared_secret(peer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::SigningKey;

    fn keypair() -> (ExchangeSecretKey, ExchangePublicKey) {
        let secret = ExchangeSecretKey::derive(&SigningKey::generate());
        let public = secret.public_key();
        (secret, public)
    }

    #[test]
    fn roundtrip() {
        let (alice, alice_pub) = keypair();
        let (bob, bob_pub) = keypair();

        let blob = seal(b"a quiet request", &bob_pub, &alice).unwrap();
        let opened = open(&blob, &alice_pub, &bob).unwrap();
        assert_eq!(opened, b"a quiet request");
    }

    #[test]
    fn roundtrip_both_directions() {
        let (alice, alice_pub) = keypair();
        let (bob, bob_pub) = keypair();

        let to_bob = seal(b"ping", &bob_pub, &alice).unwrap();
        assert_eq!(open(&to_bob, &alice_pub, &bob).unwrap(), b"ping");

        let to_alice = seal(b"pong", &alice_pub, &bob).unwrap();
        assert_eq!(open(&to_alice, &bob_pub, &alice).unwrap(), b"pong");
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let (alice, alice_pub) = keypair();
        let (bob, bob_pub) = keypair();
        let blob = seal(b"", &bob_pub, &alice).unwrap();
        assert_eq!(blob.len(), NONCE_LEN + TAG_LEN);
        assert_eq!(open(&blob, &alice_pub, &bob).unwrap(), b"");
    }

    #[test]
    fn third_party_cannot_open() {
        let (alice, alice_pub) = keypair();
        let (_bob, bob_pub) = keypair();
        let (eve, _eve_pub) = keypair();

        let blob = seal(b"for bob only", &bob_pub, &alice).unwrap();
        assert_eq!(open(&blob, &alice_pub, &eve), Err(SealError::Rejected));
    }

    #[test]
    fn tampered_blob_is_rejected() {
        let (alice, alice_pub) = keypair();
        let (bob, bob_pub) = keypair();

        let mut blob = seal(b"original", &bob_pub, &alice).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert_eq!(open(&blob, &alice_pub, &bob), Err(SealError::Rejected));
    }

    #[test]
    fn tampered_nonce_is_rejected() {
        let (alice, alice_pub) = keypair();
        let (bob, bob_pub) = keypair();

        let mut blob = seal(b"original", &bob_pub, &alice).unwrap();
        blob[0] ^= 0xFF;
        assert_eq!(open(&blob, &alice_pub, &bob), Err(SealError::Rejected));
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let (alice, alice_pub) = keypair();
        let (bob, bob_pub) = keypair();

        let blob = seal(b"short", &bob_pub, &alice).unwrap();
        assert_eq!(
            open(&blob[..NONCE_LEN], &alice_pub, &bob),
            Err(SealError::Rejected)
        );
        assert_eq!(open(&[], &alice_pub, &bob), Err(SealError::Rejected));
    }

    #[test]
    fn oversize_plaintext_fails_not_truncates() {
        let (alice, _) = keypair();
        let (_, bob_pub) = keypair();

        let too_long = vec![0u8; MAX_PLAINTEXT_LEN + 1];
        assert_eq!(
            seal(&too_long, &bob_pub, &alice),
            Err(SealError::PlaintextTooLong {
                len: MAX_PLAINTEXT_LEN + 1,
                max: MAX_PLAINTEXT_LEN,
            })
        );
    }

    #[test]
    fn max_size_plaintext_fits_the_budget() {
        let (alice, alice_pub) = keypair();
        let (bob, bob_pub) = keypair();

        let plaintext = vec![0x5a; MAX_PLAINTEXT_LEN];
        let blob = seal(&plaintext, &bob_pub, &alice).unwrap();
        assert_eq!(blob.len(), TRANSPORT_BUDGET);
        assert_eq!(open(&blob, &alice_pub, &bob).unwrap(), plaintext);
    }

    #[test]
    fn nonces_are_fresh_per_call() {
        let (alice, _) = keypair();
        let (_, bob_pub) = keypair();

        let a = seal(b"same message", &bob_pub, &alice).unwrap();
        let b = seal(b"same message", &bob_pub, &alice).unwrap();
        assert_ne!(a, b);
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
    }
}
