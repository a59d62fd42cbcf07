use sha2::{Digest, Sha512};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::signer::SigningKey;

/// X25519 secret key derived from a wallet's Ed25519 signing key.
///
/// The derivation is the standard Ed25519-to-Curve25519 conversion: the
/// X25519 scalar is the clamped first half of SHA-512 over the Ed25519
/// seed. It is pure and deterministic — the same wallet always yields the
/// bit-identical exchange keypair, so the exchange public key can be
/// published once at registration and recomputed by anyone holding the
/// signing key.
pub struct ExchangeSecretKey(StaticSecret);

/// X25519 public key of a participant, as published in its agent record.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ExchangePublicKey(PublicKey);

impl ExchangeSecretKey {
    /// Derive from a wallet signing key.
    pub fn derive(signing_key: &SigningKey) -> Self {
        Self::derive_from_seed(signing_key.as_bytes())
    }

    /// Derive from the 64-byte keypair encoding (seed ∥ public key).
    ///
    /// Only the seed half participates in the derivation.
    pub fn derive_from_keypair_bytes(keypair: &[u8; 64]) -> Self {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&keypair[..32]);
        let key = Self::derive_from_seed(&seed);
        seed.zeroize();
        key
    }

    fn derive_from_seed(seed: &[u8; 32]) -> Self {
        let digest = Sha512::digest(seed);
        let mut scalar = [0u8; 32];
        scalar.copy_from_slice(&digest[..32]);
        // Curve25519 clamping: clear the low 3 bits, clear the top bit,
        // set the second-highest bit.
        scalar[0] &= 248;
        scalar[31] &= 127;
        scalar[31] |= 64;
        let secret = StaticSecret::from(scalar);
        scalar.zeroize();
        Self(secret)
    }

    /// The corresponding public key (base-point multiplication).
    pub fn public_key(&self) -> ExchangePublicKey {
        ExchangePublicKey(PublicKey::from(&self.0))
    }

    /// X25519 Diffie-Hellman with a peer's public key.
    ///
    /// Symmetric in its arguments: `a.shared_secret(B) == b.shared_secret(A)`,
    /// so the same primitive serves both directions of a conversation.
    pub fn shared_secret(&self, peer: &ExchangePublicKey) -> [u8; 32] {
        self.0.diffie_hellman(&peer.0).to_bytes()
    }
}

impl ExchangePublicKey {
    /// Create from raw public key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(PublicKey::from(bytes))
    }

    /// Raw public key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Returns `true` for the degenerate all-zero key, which the chain
    /// rejects at registration.
    pub fn is_zero(&self) -> bool {
        self.0.to_bytes() == [0u8; 32]
    }
}

impl std::fmt::Debug for ExchangeSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExchangeSecretKey(<redacted>)")
    }
}

impl std::fmt::Debug for ExchangePublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExchangePublicKey({})", hex::encode(self.0.to_bytes()))
    }
}
