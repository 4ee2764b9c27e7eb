//! Token-stream cache
//!
//! Maps a bytecode location to its analyzed [`TokenStream`] so the
//! tokenizer and analyzer run at most once per distinct expression per
//! thread. The key is the location's identity (the address of the
//! expression bytes), not its content: if the host reuses a location for
//! different script content within one session the stale stream is
//! served. That matches the observed behavior of the engine this
//! evaluator replaces and is deliberately not "fixed" here; hosts that
//! reload scripts in place must drop the owning evaluator.
//!
//! The cache lives inside a per-thread [`Evaluator`](crate::eval::Evaluator)
//! and is never shared, so there is no locking. Entries are never
//! evicted — the backing `LruCache` is created unbounded.

use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;
use tracing::{debug, trace};

use crate::stream::TokenStream;

/// Cache key: the address of the expression bytecode.
pub type StreamKey = usize;

/// Hit/build counters, exposed for tests and diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Streams tokenized and analyzed from scratch
    pub builds: u64,
}

/// Per-thread map from bytecode location to analyzed stream.
pub struct StreamCache {
    entries: LruCache<StreamKey, Rc<TokenStream>>,
    stats: CacheStats,
}

impl std::fmt::Debug for StreamCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCache")
            .field("entries", &self.entries.len())
            .field("hits", &self.stats.hits)
            .field("builds", &self.stats.builds)
            .finish()
    }
}

impl Default for StreamCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamCache {
    pub fn new() -> Self {
        StreamCache {
            // Unbounded: entries live for the lifetime of the evaluator.
            entries: LruCache::unbounded(),
            stats: CacheStats::default(),
        }
    }

    /// Create a cache that holds at most `capacity` streams. Not used by
    /// the evaluator itself (which never evicts) but available to hosts
    /// embedding the cache elsewhere.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        StreamCache {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Look up the stream for a location, if one was already built.
    pub fn lookup(&mut self, key: StreamKey) -> Option<Rc<TokenStream>> {
        match self.entries.get(&key) {
            Some(stream) => {
                self.stats.hits += 1;
                trace!(target: "fastcond::cache", key, "hit");
                Some(Rc::clone(stream))
            }
            None => None,
        }
    }

    /// Store a freshly built stream. Streams that failed to tokenize are
    /// never stored, so a later call retries the build.
    pub fn store(&mut self, key: StreamKey, stream: Rc<TokenStream>) {
        self.stats.builds += 1;
        debug!(target: "fastcond::cache", key, tokens = stream.len(), "built stream");
        self.entries.put(key, stream);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every cached stream (mainly for tests).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}
