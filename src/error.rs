//! Errors surfaced by a [`RagSession`](crate::session::RagSession).
//!
//! Only two conditions are ever reported back to the user: a question asked
//! without a question or user id, and a document submitted without content or
//! topic. Everything else (unknown users, an empty collection) degrades to
//! defaults instead of failing. [`RagError::Index`] carries the rare failure
//! reported by the underlying HNSW index.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RagError {
    /// The question or the user id was empty.
    #[error("Please enter a question and user ID")]
    MissingInput,

    /// A document was submitted without content or without a topic.
    #[error("Please provide content and topic")]
    IncompleteDocument,

    /// The similarity index rejected an insert or failed to build.
    #[error("similarity index error: {0}")]
    Index(&'static str),
}
