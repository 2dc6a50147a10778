//! Convenient re-exports of commonly used types from doclite.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use doclite::prelude::*;
//! ```
//!
//! This provides access to:
//! - Store and collection interfaces
//! - Store backends and builders
//! - Query, update and pipeline construction
//! - Document helpers and error types

pub use doclite_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::Collection,
    document::{DocKey, DocumentExt, ID_FIELD, from_document},
    error::{DocumentStoreError, DocumentStoreResult},
    pipeline::{Pipeline, SortDirection, SortKey, Stage},
    query::{Constraints, Criterion, Query, QueryBuilder},
    store::DocumentStore,
    update::Update,
};
