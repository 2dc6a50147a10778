//! Core model and surfaces for the doclite document store.
//!
//! This crate defines everything a storage backend and its callers share:
//!
//! - **Documents** ([`document`]) - `_id`-keyed BSON documents, key
//!   normalization and JSON conversion helpers
//! - **Path resolution** ([`path`]) - dotted-path get/set over nested
//!   mappings
//! - **Queries** ([`query`]) - typed match criteria with a fluent builder
//!   and a Mongo-style wire parser
//! - **Updates** ([`update`]) - `$push`/`$pull` mutation specifications
//! - **Pipelines** ([`pipeline`]) - `$unwind`/`$group`/`$sort` aggregation
//!   stages
//! - **Backend abstraction** ([`backend`]) - the operation surface every
//!   backing presents
//! - **Collections and store** ([`collection`], [`store`]) - the handles
//!   callers actually hold
//! - **Error handling** ([`error`]) - error and result types
//!
//! # Example
//!
//! ```ignore
//! use doclite_core::{query::Query, store::DocumentStore};
//! use bson::doc;
//!
//! let store = DocumentStore::new(backend);
//! let activities = store.collection("activities");
//!
//! activities
//!     .insert_one(doc! { "_id": "Chess Club", "participants": [] })
//!     .await?;
//!
//! let found = activities
//!     .find_one(&Query::builder().eq("_id", "Chess Club").build())
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as doclite_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod path;
pub mod pipeline;
pub mod query;
pub mod store;
pub mod update;
