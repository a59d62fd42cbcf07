use std::collections::HashMap;

use chorus_types::PrayerId;

/// Locally cached plaintext for one prayer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachedPrayer {
    pub content: Option<String>,
    pub answer: Option<String>,
}

/// Poster/answerer-side plaintext cache.
///
/// Written immediately after a successful post or answer, read back purely
/// for display and delivery convenience. This is a local convenience, not a
/// protocol component: the chain holds only hashes and sealed blobs, and a
/// party that loses this cache loses nothing but its own readable copies.
#[derive(Debug, Default)]
pub struct PlaintextCache {
    entries: HashMap<PrayerId, CachedPrayer>,
}

impl PlaintextCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the content of a freshly posted prayer.
    pub fn record_content(&mut self, id: PrayerId, content: &str) {
        self.entries.entry(id).or_default().content = Some(content.to_string());
    }

    /// Record the answer this participant submitted.
    pub fn record_answer(&mut self, id: PrayerId, answer: &str) {
        self.entries.entry(id).or_default().answer = Some(answer.to_string());
    }

    /// The cached content of a prayer, if any.
    pub fn content(&self, id: PrayerId) -> Option<&str> {
        self.entries.get(&id)?.content.as_deref()
    }

    /// The cached answer of a prayer, if any.
    pub fn answer(&self, id: PrayerId) -> Option<&str> {
        self.entries.get(&id)?.answer.as_deref()
    }

    /// The full cached entry for a prayer.
    pub fn get(&self, id: PrayerId) -> Option<&CachedPrayer> {
        self.entries.get(&id)
    }

    /// Number of prayers with cached plaintext.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
