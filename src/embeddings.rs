//! # Text embeddings
//!
//! The [`DocumentStore`](crate::document_store::DocumentStore) only needs a way
//! to turn text into a fixed-size vector. That seam is the [`Embedder`] trait.
//!
//! The bundled [`HashingEmbedder`] is a feature-hashing bag of words: every
//! lowercase alphanumeric token is hashed with BLAKE3 into one of `dimension`
//! buckets with a ±1 sign, and the resulting vector is L2-normalized. It needs
//! no model download, is fully deterministic, and is good enough to put
//! snippets that share vocabulary next to each other.

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[[:alnum:]]+").unwrap());

/// Anything that maps text to a dense vector of a fixed dimension.
pub trait Embedder {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Vec<f32>;
}

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// # Panics
    /// Panics if `dimension` is zero.
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0, "embedding dimension must be positive");
        Self { dimension }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let hash = blake3::hash(token.as_bytes());
        let bytes = hash.as_bytes();

        let mut head = [0u8; 8];
        head.copy_from_slice(&bytes[..8]);
        let slot = (u64::from_le_bytes(head) % self.dimension as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };

        (slot, sign)
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];
        let lowered = text.to_lowercase();

        for token in TOKEN.find_iter(&lowered) {
            let (slot, sign) = self.bucket(token.as_str());
            vector[slot] += sign;
        }

        normalize(&mut vector);
        vector
    }
}

/// L2-normalize in place; an all-zero vector is left as is.
fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
}
