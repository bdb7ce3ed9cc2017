//! # DocumentStore
//!
//! In-memory knowledge base for the session.
//!
//! This module wraps a [HNSW](https://arxiv.org/abs/1603.09320) approximate
//! nearest-neighbor index (`hora` crate) together with an [`Embedder`]. Each
//! [`Document`] is embedded once when added; queries embed the query text and
//! ask the index for the nearest documents.
//!
//! ## Identity
//! A document's id is the hex SHA-256 of its content, so adding the same text
//! twice yields the same id. The second add keeps the existing vector and only
//! replaces the metadata.
//!
//! ## Index lifecycle
//! The HNSW graph is rebuilt from the stored vectors every time a new document
//! arrives. At the handful-of-snippets scale this store targets, that keeps the
//! index an exact function of the stored documents.
//!
//! ## Quick Example
//! ```rust
//! use std::collections::BTreeMap;
//! use personal_knowledge_rag::document_store::DocumentStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = DocumentStore::new(384);
//! let id = store.add("Rust is great!", BTreeMap::new())?;
//! assert_eq!(id, DocumentStore::content_id("Rust is great!"));
//!
//! let hits = store.query("I love Rust", 1)?;
//! assert_eq!(hits, vec!["Rust is great!".to_string()]);
//! # Ok(()) }
//! ```

use hora::core::ann_index::ANNIndex;
use hora::core::metrics::Metric;
use hora::index::hnsw_idx::HNSWIndex;
use hora::index::hnsw_params::HNSWParams;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::embeddings::{Embedder, HashingEmbedder};
use crate::error::RagError;

/// A stored snippet of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub metadata: BTreeMap<String, String>,
}

pub struct DocumentStore {
    index: HNSWIndex<f32, usize>,
    embedder: Box<dyn Embedder>,
    /// Documents in insertion order; the position is the index slot.
    documents: Vec<Document>,
    vectors: Vec<Vec<f32>>,
    slots: HashMap<String, usize>,
}

impl DocumentStore {
    /// Empty store using a [`HashingEmbedder`] of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self::with_embedder(Box::new(HashingEmbedder::new(dimension)))
    }

    pub fn with_embedder(embedder: Box<dyn Embedder>) -> Self {
        Self {
            index: HNSWIndex::new(embedder.dimension(), &HNSWParams::default()),
            embedder,
            documents: Vec::new(),
            vectors: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Deterministic id for a piece of content.
    pub fn content_id(content: &str) -> String {
        sha256::digest(content)
    }

    /// Add `content` with its `metadata` and return the document id.
    ///
    /// Re-adding identical content overwrites the metadata of the existing
    /// document and leaves the index alone.
    ///
    /// # Errors
    /// [`RagError::Index`] if the HNSW index rejects the vector or fails to build.
    pub fn add(
        &mut self,
        content: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<String, RagError> {
        let id = Self::content_id(content);

        if let Some(&slot) = self.slots.get(&id) {
            debug!(id = %id, "Document already present, replacing metadata");
            self.documents[slot].metadata = metadata;
            return Ok(id);
        }

        let vector = self.embedder.embed(content);
        self.documents.push(Document {
            id: id.clone(),
            content: content.to_string(),
            metadata,
        });
        self.vectors.push(vector);
        self.slots.insert(id.clone(), self.documents.len() - 1);

        if let Err(e) = self.rebuild_index() {
            self.rollback_last();
            return Err(e);
        }

        info!(id = %id, total = self.documents.len(), "Document added");
        Ok(id)
    }

    /// Up to `k` document contents nearest to `text`, best first.
    ///
    /// An empty store or `k == 0` yields an empty vector.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<String>, RagError> {
        Ok(self
            .search(text, k)?
            .into_iter()
            .map(|doc| doc.content.clone())
            .collect())
    }

    /// Like [`query`](Self::query) but returns the documents themselves.
    pub fn search(&self, text: &str, k: usize) -> Result<Vec<&Document>, RagError> {
        if self.documents.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(text);
        if vector.len() != self.embedder.dimension() {
            return Err(RagError::Index("dimension mismatch"));
        }

        let slots = self.index.search(&vector, k);
        debug!(query = text, ?slots, "Index search");

        Ok(slots
            .into_iter()
            .filter_map(|slot| self.documents.get(slot))
            .take(k)
            .collect())
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.slots.get(id).map(|&slot| &self.documents[slot])
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn rebuild_index(&mut self) -> Result<(), RagError> {
        let mut index: HNSWIndex<f32, usize> =
            HNSWIndex::new(self.embedder.dimension(), &HNSWParams::default());
        for (slot, vector) in self.vectors.iter().enumerate() {
            index.add(vector.as_slice(), slot).map_err(RagError::Index)?;
        }
        index.build(Metric::Euclidean).map_err(RagError::Index)?;
        self.index = index;
        Ok(())
    }

    fn rollback_last(&mut self) {
        if let Some(doc) = self.documents.pop() {
            self.slots.remove(&doc.id);
            self.vectors.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(topic: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("topic".to_string(), topic.to_string())])
    }

    #[test]
    fn test_same_content_same_id() -> Result<(), RagError> {
        let mut store = DocumentStore::new(64);
        let first = store.add("Rust is cool.", metadata("a"))?;
        let second = store.add("Rust is cool.", metadata("b"))?;

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&first).unwrap().metadata["topic"], "b");
        Ok(())
    }

    #[test]
    fn test_different_content_different_id() {
        assert_ne!(
            DocumentStore::content_id("I love programming."),
            DocumentStore::content_id("I love programming!")
        );
        assert_eq!(DocumentStore::content_id("x").len(), 64);
    }

    #[test]
    fn test_query_empty_store_is_empty() -> Result<(), RagError> {
        let store = DocumentStore::new(384);
        assert!(store.query("anything at all", 3)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_query_respects_k() -> Result<(), RagError> {
        let mut store = DocumentStore::new(384);
        for content in ["alpha beta", "gamma delta", "epsilon zeta", "eta theta"] {
            store.add(content, BTreeMap::new())?;
        }

        assert!(store.query("alpha", 2)?.len() <= 2);
        assert!(!store.query("alpha", 2)?.is_empty());
        assert!(store.query("alpha", 0)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_exact_content_ranks_first() -> Result<(), RagError> {
        let mut store = DocumentStore::new(384);
        store.add("Rust is cool.", BTreeMap::new())?;
        store.add("I love programming.", BTreeMap::new())?;
        store.add("Bread needs flour and water.", BTreeMap::new())?;

        let hits = store.query("Bread needs flour and water.", 1)?;
        assert_eq!(hits, vec!["Bread needs flour and water.".to_string()]);
        Ok(())
    }
}
