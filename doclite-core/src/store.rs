//! The document store facade.
//!
//! [`DocumentStore`] owns a backend and hands out [`Collection`] handles.
//! The store is constructed explicitly and passed to whatever layer needs
//! it; there is no process-global instance. A caller choosing its backing
//! at runtime can use `DocumentStore<Arc<dyn StoreBackend>>`.

use crate::{backend::StoreBackend, collection::Collection};

/// A document store bound to a backend implementation.
///
/// # Example
///
/// ```ignore
/// use doclite_core::store::DocumentStore;
///
/// let store = DocumentStore::new(backend);
/// let activities = store.collection("activities");
/// let teachers = store.collection("teachers");
/// ```
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a handle for the collection with the given name.
    ///
    /// Collections spring into existence on first insert; a handle to a
    /// collection that was never written reads as empty.
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
