//! Offline feature-hashing embedder.
//!
//! Words and character trigrams are hashed into a fixed number of buckets
//! and the result is normalised to unit length. It captures lexical overlap
//! only, but needs no model files and is fully deterministic, which makes it
//! the default provider and a stable baseline for tests.

use ahash::RandomState;
use distrag_core::{Embedder, Result, Vector};
use rayon::prelude::*;
use std::collections::HashSet;

pub const DEFAULT_DIM: usize = 384;

/// L2 cutoff at which shared district, year and keyword tokens count as a
/// match. Unrelated texts sit near sqrt 2.
pub const DISTANCE_THRESHOLD: f32 = 1.2;

const WORD_WEIGHT: f32 = 2.0;
const TRIGRAM_WEIGHT: f32 = 1.0;

// Fixed seeds keep bucket assignment stable across runs.
const SEEDS: (u64, u64, u64, u64) = (
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
);

#[derive(Clone)]
pub struct HashingEmbedder {
    dim: usize,
    hasher: RandomState,
    name: String,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self {
            dim,
            hasher: RandomState::with_seeds(SEEDS.0, SEEDS.1, SEEDS.2, SEEDS.3),
            name: format!("feature-hashing-{}", dim),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        (self.hasher.hash_one(token) % self.dim as u64) as usize
    }

    fn embed(&self, text: &str) -> Vector {
        let mut data = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();
        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        for trigram in trigrams(&words.join(" ")) {
            data[self.bucket(&trigram)] += TRIGRAM_WEIGHT;
        }
        for word in &words {
            data[self.bucket(word)] += WORD_WEIGHT;
        }

        Vector::new(data).normalized()
    }
}

/// Character trigrams of `text` padded with two spaces on each side
fn trigrams(text: &str) -> HashSet<String> {
    if text.is_empty() {
        return HashSet::new();
    }
    let padded = format!("  {}  ", text);
    let chars: Vec<char> = padded.chars().collect();
    chars.windows(3).map(|w| w.iter().collect::<String>()).collect()
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn recommended_threshold(&self) -> f32 {
        DISTANCE_THRESHOLD
    }

    fn encode(&self, text: &str) -> Result<Vector> {
        Ok(self.embed(text))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.par_iter().map(|text| self.embed(text)).collect())
    }
}
