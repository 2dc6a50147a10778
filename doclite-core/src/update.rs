//! Update specifications for in-place document mutation.
//!
//! An update names fields to `$push` a value onto and fields to `$pull` a
//! value out of. Both operators only act on sequence-valued fields; a push
//! onto an absent field first creates an empty sequence there, and either
//! operator applied to a non-sequence field is a no-op rather than an error.
//!
//! ```ignore
//! use doclite_core::update::Update;
//!
//! let update = Update::new().push("participants", "newkid@mergington.edu");
//! ```

use bson::{Bson, Document};

/// A mutation specification: `$push` and `$pull` entries, applied in order.
#[derive(Debug, Clone, Default)]
pub struct Update {
    /// Fields to append a value to, in specification order.
    pub push: Vec<(String, Bson)>,
    /// Fields to remove all structurally-equal elements from.
    pub pull: Vec<(String, Bson)>,
}

impl Update {
    /// Creates an empty update (applying it changes nothing).
    pub fn new() -> Self {
        Update::default()
    }

    /// Appends `value` to the sequence at `path`.
    pub fn push(mut self, path: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.push.push((path.into(), value.into()));
        self
    }

    /// Removes every element structurally equal to `value` from the sequence
    /// at `path`.
    pub fn pull(mut self, path: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.pull.push((path.into(), value.into()));
        self
    }

    /// Parses a Mongo-style update document.
    ///
    /// `$push` and `$pull` sub-documents are recognized; any other operator
    /// key is silently ignored, so an unrecognized update is an empty
    /// (no-op) update rather than an error.
    pub fn from_document(document: &Document) -> Self {
        let mut update = Update::new();
        if let Some(Bson::Document(fields)) = document.get("$push") {
            for (path, value) in fields {
                update.push.push((path.to_string(), value.clone()));
            }
        }
        if let Some(Bson::Document(fields)) = document.get("$pull") {
            for (path, value) in fields {
                update.pull.push((path.to_string(), value.clone()));
            }
        }
        update
    }

    /// Returns `true` if this update has no entries.
    pub fn is_empty(&self) -> bool {
        self.push.is_empty() && self.pull.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn parses_push_and_pull() {
        let update = Update::from_document(&doc! {
            "$push": { "participants": "amy@mergington.edu" },
            "$pull": { "waitlist": "ben@mergington.edu" },
        });

        assert_eq!(update.push, vec![(
            "participants".to_string(),
            Bson::String("amy@mergington.edu".to_string()),
        )]);
        assert_eq!(update.pull.len(), 1);
    }

    #[test]
    fn unknown_operators_parse_to_noop() {
        let update = Update::from_document(&doc! { "$set": { "status": "open" } });
        assert!(update.is_empty());
    }

    #[test]
    fn builder_preserves_field_order() {
        let update = Update::new()
            .push("participants", "a@x.edu")
            .push("history", "joined")
            .pull("waitlist", "a@x.edu");
        assert_eq!(update.push[0].0, "participants");
        assert_eq!(update.push[1].0, "history");
        assert_eq!(update.pull[0].0, "waitlist");
    }
}
