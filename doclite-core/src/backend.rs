//! Storage backend abstraction for the document store.
//!
//! [`StoreBackend`] is the operation surface every backing must present:
//! the same six calls whether documents live in this process or behind a
//! driver. The trait is object safe, so callers that pick a backing at
//! runtime can hold an `Arc<dyn StoreBackend>` and hand out collection
//! handles over it.

use async_trait::async_trait;
use bson::Document;
use std::{fmt::Debug, sync::Arc};

use crate::{error::DocumentStoreResult, pipeline::Pipeline, query::Query, update::Update};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be safe to share across async tasks. Readers must
/// never observe a document mid-mutation, and `update_one` must evaluate its
/// "first match" against one consistent view of the collection.
///
/// # Copies
///
/// Every document a backend returns is an independent copy; callers may
/// mutate results freely without affecting stored state.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Counts the documents in `collection` matching `query`. The empty
    /// query counts everything.
    async fn count_documents(&self, query: &Query, collection: &str)
    -> DocumentStoreResult<u64>;

    /// Stores `document` keyed by its `_id`, overwriting any existing
    /// document under the same key. The collection is created if it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`](crate::error::DocumentStoreError::InvalidDocument)
    /// if the document has no `_id` field.
    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<()>;

    /// Returns copies of every document matching `query`, in the
    /// collection's enumeration order. The result is a snapshot taken at
    /// call time; later mutations do not affect it.
    async fn find(&self, query: &Query, collection: &str) -> DocumentStoreResult<Vec<Document>>;

    /// Returns a copy of the first document (in enumeration order) matching
    /// `query`, or `None` if nothing matches. When several documents match,
    /// which one is first is implementation-defined.
    async fn find_one(
        &self,
        query: &Query,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>>;

    /// Applies `update` to the first document matching `query` and persists
    /// the result. Returns 1 if the update changed something, 0 if nothing
    /// matched or the matched document was left unchanged. Never touches
    /// more than one document.
    async fn update_one(
        &self,
        query: &Query,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Runs `pipeline` over copies of the collection's documents and returns
    /// the resulting sequence.
    async fn aggregate(
        &self,
        pipeline: &Pipeline,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend + ?Sized,
{
    async fn count_documents(
        &self,
        query: &Query,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        (**self).count_documents(query, collection).await
    }

    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<()> {
        (**self).insert_one(document, collection).await
    }

    async fn find(&self, query: &Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        (**self).find(query, collection).await
    }

    async fn find_one(
        &self,
        query: &Query,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        (**self).find_one(query, collection).await
    }

    async fn update_one(
        &self,
        query: &Query,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        (**self).update_one(query, update, collection).await
    }

    async fn aggregate(
        &self,
        pipeline: &Pipeline,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (**self).aggregate(pipeline, collection).await
    }
}

#[async_trait]
impl<B> StoreBackend for Arc<B>
where
    B: StoreBackend + ?Sized,
{
    async fn count_documents(
        &self,
        query: &Query,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        (**self).count_documents(query, collection).await
    }

    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<()> {
        (**self).insert_one(document, collection).await
    }

    async fn find(&self, query: &Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        (**self).find(query, collection).await
    }

    async fn find_one(
        &self,
        query: &Query,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        (**self).find_one(query, collection).await
    }

    async fn update_one(
        &self,
        query: &Query,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        (**self).update_one(query, update, collection).await
    }

    async fn aggregate(
        &self,
        pipeline: &Pipeline,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (**self).aggregate(pipeline, collection).await
    }
}

/// Factory trait for constructing backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
