//! In-memory storage implementation.
//!
//! Documents are held in per-collection maps behind an async-aware
//! read-write lock; every operation takes the lock exactly once, so readers
//! always see a consistent snapshot and updates appear atomic.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::Document;
use indexmap::IndexMap;
use mea::rwlock::RwLock;

use doclite_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{DocKey, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    pipeline::Pipeline,
    query::Query,
    update::Update,
};

use crate::{aggregate::run_pipeline, applier::apply_update, evaluator::matches_document};

type CollectionMap = IndexMap<DocKey, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// Each collection maps primary keys to documents in insertion order, which
/// is therefore the enumeration order seen by `find`, `find_one` and
/// `update_one` ("first match"). Overwriting an existing `_id` keeps the
/// document's original position. There is no delete operation in the
/// supported subset.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same data and the store can be moved across async tasks
/// freely.
///
/// # Performance
///
/// Every query scans the whole collection; there is no indexing. The
/// intended datasets (a process-local fallback for a handful of
/// collections) make that a non-issue.
///
/// # Example
///
/// ```ignore
/// use doclite_memory::InMemoryStore;
/// use doclite_core::{query::Query, store::DocumentStore};
/// use bson::doc;
///
/// let store = DocumentStore::new(InMemoryStore::new());
/// let activities = store.collection("activities");
///
/// activities
///     .insert_one(doc! { "_id": "Chess Club", "participants": [] })
///     .await?;
/// let found = activities
///     .find_one(&Query::builder().eq("_id", "Chess Club").build())
///     .await?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> (primary key -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    ///
    /// Currently the builder has no options; it exists so backends are
    /// constructed uniformly through [`StoreBackendBuilder`].
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn count_documents(
        &self,
        query: &Query,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(0);
        };

        Ok(collection_map
            .values()
            .filter(|doc| matches_document(doc, query))
            .count() as u64)
    }

    async fn insert_one(&self, document: Document, collection: &str) -> DocumentStoreResult<()> {
        let Some(id) = document.get(ID_FIELD) else {
            log::error!("rejected document without {ID_FIELD} for collection {collection}");
            return Err(DocumentStoreError::InvalidDocument(format!(
                "document must include an {ID_FIELD} field"
            )));
        };
        let key = DocKey::from(id);

        let mut store = self.store.write().await;
        store
            .entry(collection.to_string())
            .or_default()
            .insert(key, document);

        Ok(())
    }

    async fn find(&self, query: &Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(Vec::new());
        };

        // Snapshot semantics: matches are cloned under one lock acquisition.
        Ok(collection_map
            .values()
            .filter(|doc| matches_document(doc, query))
            .cloned()
            .collect())
    }

    async fn find_one(
        &self,
        query: &Query,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(None);
        };

        Ok(collection_map
            .values()
            .find(|doc| matches_document(doc, query))
            .cloned())
    }

    async fn update_one(
        &self,
        query: &Query,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Ok(0);
        };

        for document in collection_map.values_mut() {
            if matches_document(document, query) {
                let modified = apply_update(document, update);
                return Ok(modified as u64);
            }
        }

        Ok(0)
    }

    async fn aggregate(
        &self,
        pipeline: &Pipeline,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let documents = {
            let store = self.store.read().await;
            store
                .get(collection)
                .map(|collection_map| collection_map.values().cloned().collect())
                .unwrap_or_default()
        };

        Ok(run_pipeline(documents, pipeline))
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance. Always succeeds.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    fn by_id(id: &str) -> Query {
        Query::builder().eq(ID_FIELD, id).build()
    }

    #[test]
    fn insert_then_find_one_round_trips() {
        block_on(async {
            let store = store();
            let doc = doc! {
                "_id": "Chess Club",
                "schedule_details": { "days": ["Monday", "Friday"] },
                "participants": ["michael@mergington.edu"],
            };
            store.insert_one(doc.clone(), "activities").await.unwrap();

            let found = store
                .find_one(&by_id("Chess Club"), "activities")
                .await
                .unwrap();
            assert_eq!(found, Some(doc));
        });
    }

    #[test]
    fn returned_documents_are_independent_copies() {
        block_on(async {
            let store = store();
            store
                .insert_one(doc! { "_id": "a", "tags": ["x"] }, "activities")
                .await
                .unwrap();

            let mut copy = store
                .find_one(&by_id("a"), "activities")
                .await
                .unwrap()
                .unwrap();
            copy.insert("tags", Bson::Array(vec!["mutated".into()]));

            let fresh = store
                .find_one(&by_id("a"), "activities")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(fresh, doc! { "_id": "a", "tags": ["x"] });
        });
    }

    #[test]
    fn insert_without_id_is_rejected() {
        block_on(async {
            let store = store();
            let err = store
                .insert_one(doc! { "name": "anonymous" }, "activities")
                .await;
            assert!(matches!(err, Err(DocumentStoreError::InvalidDocument(_))));
            assert_eq!(
                store.count_documents(&Query::new(), "activities").await.unwrap(),
                0
            );
        });
    }

    #[test]
    fn duplicate_id_overwrites_and_keeps_one_document() {
        block_on(async {
            let store = store();
            store
                .insert_one(doc! { "_id": "a", "v": 1 }, "activities")
                .await
                .unwrap();
            store
                .insert_one(doc! { "_id": "a", "v": 2 }, "activities")
                .await
                .unwrap();

            assert_eq!(
                store.count_documents(&Query::new(), "activities").await.unwrap(),
                1
            );
            let found = store.find_one(&by_id("a"), "activities").await.unwrap();
            assert_eq!(found, Some(doc! { "_id": "a", "v": 2 }));
        });
    }

    #[test]
    fn missing_collection_reads_as_empty() {
        block_on(async {
            let store = store();
            assert_eq!(
                store.count_documents(&Query::new(), "nowhere").await.unwrap(),
                0
            );
            assert_eq!(store.find(&Query::new(), "nowhere").await.unwrap(), vec![]);
            assert_eq!(store.find_one(&Query::new(), "nowhere").await.unwrap(), None);
            assert_eq!(
                store
                    .update_one(&Query::new(), &Update::new().push("x", 1), "nowhere")
                    .await
                    .unwrap(),
                0
            );
            assert_eq!(
                store.aggregate(&Pipeline::new(), "nowhere").await.unwrap(),
                vec![]
            );
        });
    }

    #[test]
    fn find_filters_and_preserves_insertion_order() {
        block_on(async {
            let store = store();
            for (id, n) in [("a", 10), ("b", 30), ("c", 20)] {
                store
                    .insert_one(doc! { "_id": id, "max_participants": n }, "activities")
                    .await
                    .unwrap();
            }

            let query = Query::builder()
                .gte("max_participants", 15)
                .lte("max_participants", 30)
                .build();
            let found = store.find(&query, "activities").await.unwrap();
            let ids: Vec<_> = found.iter().map(|d| d.get_str("_id").unwrap()).collect();
            assert_eq!(ids, vec!["b", "c"]);
        });
    }

    #[test]
    fn find_results_are_a_snapshot() {
        block_on(async {
            let store = store();
            store
                .insert_one(doc! { "_id": "a", "v": 1 }, "activities")
                .await
                .unwrap();

            let snapshot = store.find(&Query::new(), "activities").await.unwrap();
            store
                .insert_one(doc! { "_id": "a", "v": 2 }, "activities")
                .await
                .unwrap();

            assert_eq!(snapshot, vec![doc! { "_id": "a", "v": 1 }]);
        });
    }

    #[test]
    fn update_one_on_no_match_returns_zero() {
        block_on(async {
            let store = store();
            store
                .insert_one(doc! { "_id": "a", "participants": [] }, "activities")
                .await
                .unwrap();

            let modified = store
                .update_one(
                    &by_id("missing"),
                    &Update::new().push("participants", "x@y.edu"),
                    "activities",
                )
                .await
                .unwrap();
            assert_eq!(modified, 0);

            let untouched = store.find_one(&by_id("a"), "activities").await.unwrap();
            assert_eq!(untouched, Some(doc! { "_id": "a", "participants": [] }));
        });
    }

    #[test]
    fn update_one_with_unchanged_document_returns_zero() {
        block_on(async {
            let store = store();
            store
                .insert_one(doc! { "_id": "a", "participants": "full" }, "activities")
                .await
                .unwrap();

            // $push onto a non-sequence is a no-op, so nothing was modified.
            let modified = store
                .update_one(
                    &by_id("a"),
                    &Update::new().push("participants", "x@y.edu"),
                    "activities",
                )
                .await
                .unwrap();
            assert_eq!(modified, 0);
        });
    }

    #[test]
    fn update_one_touches_only_the_first_match() {
        block_on(async {
            let store = store();
            store
                .insert_one(doc! { "_id": "a", "kind": "club", "tags": [] }, "activities")
                .await
                .unwrap();
            store
                .insert_one(doc! { "_id": "b", "kind": "club", "tags": [] }, "activities")
                .await
                .unwrap();

            let query = Query::builder().eq("kind", "club").build();
            let modified = store
                .update_one(&query, &Update::new().push("tags", "seen"), "activities")
                .await
                .unwrap();
            assert_eq!(modified, 1);

            let first = store.find_one(&by_id("a"), "activities").await.unwrap().unwrap();
            let second = store.find_one(&by_id("b"), "activities").await.unwrap().unwrap();
            assert_eq!(first.get_array("tags").unwrap().len(), 1);
            assert_eq!(second.get_array("tags").unwrap().len(), 0);
        });
    }

    #[test]
    fn push_then_pull_restores_participants() {
        block_on(async {
            let store = store();
            let before = doc! { "_id": "Chess Club", "participants": ["a@x.edu"] };
            store.insert_one(before.clone(), "activities").await.unwrap();

            let query = by_id("Chess Club");
            let pushed = store
                .update_one(
                    &query,
                    &Update::new().push("participants", "x@y.edu"),
                    "activities",
                )
                .await
                .unwrap();
            assert_eq!(pushed, 1);

            let pulled = store
                .update_one(
                    &query,
                    &Update::new().pull("participants", "x@y.edu"),
                    "activities",
                )
                .await
                .unwrap();
            assert_eq!(pulled, 1);

            let restored = store.find_one(&query, "activities").await.unwrap();
            assert_eq!(restored, Some(before));
        });
    }

    #[test]
    fn aggregate_unwinds_and_groups_in_first_seen_order() {
        block_on(async {
            let store = store();
            store
                .insert_one(doc! { "_id": "A", "days": ["Mon", "Tue"] }, "activities")
                .await
                .unwrap();
            store
                .insert_one(doc! { "_id": "B", "days": ["Tue"] }, "activities")
                .await
                .unwrap();

            let pipeline = Pipeline::new().unwind("days").group("days");
            let groups = store.aggregate(&pipeline, "activities").await.unwrap();
            assert_eq!(groups, vec![doc! { "_id": "Mon" }, doc! { "_id": "Tue" }]);
        });
    }
}
