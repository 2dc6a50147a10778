//! Main doclite crate providing a unified interface for document storage.
//!
//! This crate is the primary entry point for users of the doclite library.
//! It re-exports the core types and functionality from various sub-crates and
//! provides convenient access to the in-memory storage backend.
//!
//! Doclite is an embeddable, in-process document store that emulates the
//! subset of MongoDB-style operations an application actually uses, so code
//! written against that surface keeps working when no external database is
//! reachable.
//!
//! # Features
//!
//! - **Schemaless BSON documents** - Store any `bson::Document` keyed by its `_id`
//! - **Mongo-style queries** - Equality, `$in` membership and inclusive `$gte`/`$lte` ranges
//! - **Targeted updates** - `$push` and `$pull` against top-level or dotted paths
//! - **Aggregation** - `$unwind`, `$group` and `$sort` pipeline stages
//! - **Runtime backend selection** - Operate through `Arc<dyn StoreBackend>` when the
//!   backing store is only known at startup
//!
//! # Quick Start
//!
//! ```ignore
//! use doclite::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an in-memory store backend
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let activities = store.collection("activities");
//!
//!     // Seed startup data only when the collection is empty
//!     activities
//!         .seed_if_empty(vec![doc! {
//!             "_id": "Chess Club",
//!             "max_participants": 12,
//!             "participants": [],
//!             "schedule_details": { "days": ["Monday", "Friday"] },
//!         }])
//!         .await?;
//!
//!     // Sign a student up
//!     activities
//!         .update_one(
//!             &Query::builder().eq("_id", "Chess Club").build(),
//!             &Update::new().push("participants", "michael@mergington.edu"),
//!         )
//!         .await?;
//!
//!     // List the distinct days any activity meets on
//!     let days = activities
//!         .aggregate(
//!             &Pipeline::new()
//!                 .unwind("schedule_details.days")
//!                 .group("schedule_details.days")
//!                 .sort("_id", SortDirection::Asc),
//!         )
//!         .await?;
//!
//!     println!("Days: {days:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the backend is chosen at runtime (for example, an external database
//! when reachable and the in-memory store otherwise), erase the concrete type
//! behind `Arc<dyn StoreBackend>`; the store and collections work unchanged:
//!
//! ```ignore
//! use std::sync::Arc;
//! use doclite::{prelude::*, memory::InMemoryStore};
//!
//! let backend: Arc<dyn StoreBackend> = Arc::new(InMemoryStore::new());
//! let store = DocumentStore::new(backend);
//! let activities = store.collection("activities");
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-process storage, the fallback when nothing else is available

pub mod prelude;

pub use doclite_core::{backend, collection, document, error, path, pipeline, query, store, update};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use doclite_memory::{InMemoryStore, InMemoryStoreBuilder};
}
