//! Collection handles over a storage backend.
//!
//! A [`Collection`] pairs a collection name with a backend reference and
//! exposes the full operation surface on it. Handles are cheap to create and
//! borrow the backend, so a caller typically holds one per logical
//! collection (for example one for activities and one for teachers) while
//! the backend itself is shared.
//!
//! ```ignore
//! use doclite_core::{query::Query, store::DocumentStore};
//!
//! let store = DocumentStore::new(backend);
//! let activities = store.collection("activities");
//! let total = activities.count_documents(&Query::new()).await?;
//! ```

use bson::Document;

use crate::{
    backend::StoreBackend,
    error::DocumentStoreResult,
    pipeline::Pipeline,
    query::Query,
    update::Update,
};

/// A named collection bound to a storage backend.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend + ?Sized> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend + ?Sized> Collection<'a, B> {
    /// Creates a new collection handle (internal use).
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counts the documents matching `query`.
    pub async fn count_documents(&self, query: &Query) -> DocumentStoreResult<u64> {
        self.backend.count_documents(query, &self.name).await
    }

    /// Stores `document` keyed by its `_id`, overwriting any prior document
    /// under the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no `_id` field.
    pub async fn insert_one(&self, document: Document) -> DocumentStoreResult<()> {
        self.backend.insert_one(document, &self.name).await
    }

    /// Returns copies of every matching document, in enumeration order.
    pub async fn find(&self, query: &Query) -> DocumentStoreResult<Vec<Document>> {
        self.backend.find(query, &self.name).await
    }

    /// Returns a copy of the first matching document, or `None`.
    pub async fn find_one(&self, query: &Query) -> DocumentStoreResult<Option<Document>> {
        self.backend.find_one(query, &self.name).await
    }

    /// Applies `update` to the first matching document. Returns the number
    /// of documents actually modified (0 or 1).
    pub async fn update_one(&self, query: &Query, update: &Update) -> DocumentStoreResult<u64> {
        self.backend.update_one(query, update, &self.name).await
    }

    /// Runs an aggregation pipeline over the collection.
    pub async fn aggregate(&self, pipeline: &Pipeline) -> DocumentStoreResult<Vec<Document>> {
        self.backend.aggregate(pipeline, &self.name).await
    }

    /// Populates the collection with `documents` if it is currently empty.
    ///
    /// Returns `true` if seeding happened. A collection that already holds
    /// any document is left untouched, so repeated startup seeding is
    /// idempotent.
    pub async fn seed_if_empty(&self, documents: Vec<Document>) -> DocumentStoreResult<bool> {
        if self.count_documents(&Query::new()).await? > 0 {
            return Ok(false);
        }

        log::debug!("seeding empty collection {}", self.name);
        for document in documents {
            self.insert_one(document).await?;
        }
        Ok(true)
    }
}
