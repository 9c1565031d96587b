//! Classification result cache.
//!
//! Entries are addressed by `"vision_cls_v2:" + image URL`; the in-memory
//! implementation stores them under the BLAKE3 hash of that key.

use async_trait::async_trait;
use moka::sync::Cache;

use super::parser::ClassificationResult;
use crate::constants::VISION_CACHE_PREFIX;

/// Builds the cache key for an image URL.
#[inline]
pub fn cache_key(image_url: &str) -> String {
    format!("{VISION_CACHE_PREFIX}:{image_url}")
}

/// Key-value store for classification results (in-process, Redis, ...).
#[async_trait]
pub trait ClassificationCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<ClassificationResult>;
    async fn set(&self, key: &str, result: ClassificationResult);
}

/// Bounded in-memory cache with LRU-style eviction.
pub struct MokaClassificationCache {
    entries: Cache<[u8; 32], ClassificationResult>,
}

impl MokaClassificationCache {
    const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    #[inline]
    fn hash_key(key: &str) -> [u8; 32] {
        *blake3::hash(key.as_bytes()).as_bytes()
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for MokaClassificationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClassificationCache for MokaClassificationCache {
    async fn get(&self, key: &str) -> Option<ClassificationResult> {
        self.entries.get(&Self::hash_key(key))
    }

    async fn set(&self, key: &str, result: ClassificationResult) {
        self.entries.insert(Self::hash_key(key), result);
    }
}
