//! Content-addressed memoization of sentence embeddings.
//!
//! Keys are SHA-256 digests of the raw sentence text. The memo only saves
//! recomputation; a hit returns exactly what the wrapped model produced.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use ring::digest::{SHA256, digest};
use tracing::debug;

use crate::model::SentenceEmbedder;

type Key = [u8; 32];

struct Memo {
    vectors: HashMap<Key, Vec<f32>>,
    order: VecDeque<Key>,
    capacity: usize,
}

impl Memo {
    fn insert(&mut self, key: Key, vector: Vec<f32>) {
        if self.capacity == 0 || self.vectors.contains_key(&key) {
            return;
        }
        while self.vectors.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.vectors.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key);
        self.vectors.insert(key, vector);
    }
}

/// A [`SentenceEmbedder`] that remembers up to `capacity` vectors, evicting
/// the oldest first.
pub struct CachedEmbedder {
    inner: Arc<dyn SentenceEmbedder>,
    memo: Mutex<Memo>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn SentenceEmbedder>, capacity: usize) -> Self {
        Self {
            inner,
            memo: Mutex::new(Memo {
                vectors: HashMap::new(),
                order: VecDeque::new(),
                capacity,
            }),
        }
    }

    /// Number of memoized vectors.
    pub fn len(&self) -> usize {
        self.memo.lock().map(|m| m.vectors.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn key_for(text: &str) -> Key {
    let mut key = [0u8; 32];
    key.copy_from_slice(digest(&SHA256, text.as_bytes()).as_ref());
    key
}

impl SentenceEmbedder for CachedEmbedder {
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let keys: Vec<Key> = texts.iter().map(|t| key_for(t)).collect();
        let mut out: Vec<Option<Vec<f32>>> = {
            let memo = self
                .memo
                .lock()
                .map_err(|_| anyhow::anyhow!("embedding memo lock poisoned"))?;
            keys.iter().map(|k| memo.vectors.get(k).cloned()).collect()
        };

        // Embed each distinct miss once, in a single batch.
        let mut miss_keys: Vec<Key> = Vec::new();
        let mut miss_texts: Vec<&str> = Vec::new();
        for (i, slot) in out.iter().enumerate() {
            if slot.is_none() && !miss_keys.contains(&keys[i]) {
                miss_keys.push(keys[i]);
                miss_texts.push(texts[i]);
            }
        }

        if !miss_texts.is_empty() {
            debug!(hits = texts.len() - miss_texts.len(), misses = miss_texts.len(), "embedding memo");
            let fresh = self.inner.embed_batch(&miss_texts)?;
            anyhow::ensure!(
                fresh.len() == miss_texts.len(),
                "embedder returned {} vectors for {} texts",
                fresh.len(),
                miss_texts.len()
            );
            let fresh: HashMap<Key, Vec<f32>> = miss_keys.into_iter().zip(fresh).collect();
            for (i, slot) in out.iter_mut().enumerate() {
                if slot.is_none() {
                    *slot = fresh.get(&keys[i]).cloned();
                }
            }
            let mut memo = self
                .memo
                .lock()
                .map_err(|_| anyhow::anyhow!("embedding memo lock poisoned"))?;
            for (key, vector) in fresh {
                memo.insert(key, vector);
            }
        }

        out.into_iter()
            .map(|v| v.ok_or_else(|| anyhow::anyhow!("missing embedding after batch")))
            .collect()
    }
}
