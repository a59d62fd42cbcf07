/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a prayer's content and its answer never collide even
/// when the underlying bytes are identical. The resulting 32-byte digests
/// are what the chain stores — the chain never observes plaintext, and it
/// never verifies that a delivered blob decrypts to bytes matching the
/// hash. That correspondence is checked peer-to-peer by the participants.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for prayer content.
    pub const PRAYER_CONTENT: Self = Self {
        domain: "chorus-content-v1",
    };
    /// Hasher for prayer answers.
    pub const PRAYER_ANSWER: Self = Self {
        domain: "chorus-answer-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<[u8; 32], serde_json::Error> {
        let data = serde_json::to_vec(value)?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected hash.
    pub fn verify(&self, data: &[u8], expected: &[u8; 32]) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
