//! In-memory document storage backend for doclite.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `StoreBackend` trait. It uses async-aware read-write locks for concurrent
//! access and is the fallback storage used when no external database is
//! available.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Type-erased storage** - Stores documents as BSON for flexibility
//! - **Query evaluation** - Equality, membership and inclusive range matching
//! - **Aggregation** - Unwind, group and sort stages executed in process
//!
//! # Quick Start
//!
//! ```ignore
//! use doclite_memory::InMemoryStore;
//! use doclite_core::{query::Query, store::DocumentStore, update::Update};
//! use bson::doc;
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let activities = store.collection("activities");
//!
//! activities
//!     .insert_one(doc! { "_id": "Chess Club", "participants": [] })
//!     .await?;
//! activities
//!     .update_one(
//!         &Query::builder().eq("_id", "Chess Club").build(),
//!         &Update::new().push("participants", "michael@mergington.edu"),
//!     )
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as doclite_memory;

mod aggregate;
mod applier;
mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
