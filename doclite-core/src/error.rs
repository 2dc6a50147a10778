//! Error and result types for document store operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.
//! Note that "no matching document" is not an error: `find_one` signals it
//! with `Ok(None)`.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
///
/// Malformed queries and updates (unrecognized operators, type mismatches in
/// comparisons) deliberately do not appear here: the evaluator and applier
/// treat them as non-matches and no-ops instead of failing.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The document is missing its `_id` field or is otherwise not storable.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An aggregation pipeline contained a stage this store does not implement.
    #[error("Unsupported aggregation stage: {0}")]
    UnsupportedStage(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
