//! Update application for in-memory documents.
//!
//! Mutations follow the same permissive contract as matching: an operator
//! aimed at a field of the wrong shape is a no-op, not an error.

use bson::{Bson, Document};

use doclite_core::{
    path::{get_path, get_path_mut, set_path},
    update::Update,
};

use crate::evaluator::Comparable;

/// Applies `update` to `document` in place. Returns `true` iff any field
/// actually changed.
///
/// `$push` onto an absent field first creates an empty sequence there (the
/// only coercion performed); `$push` onto a present non-sequence value, and
/// `$pull` from anything that is not a sequence, are no-ops. `$pull` removes
/// every element structurally equal to its value.
pub(crate) fn apply_update(document: &mut Document, update: &Update) -> bool {
    let mut changed = false;

    for (path, value) in &update.push {
        if get_path(document, path).is_none() {
            set_path(document, path, Bson::Array(Vec::new()));
        }
        if let Some(Bson::Array(items)) = get_path_mut(document, path) {
            items.push(value.clone());
            changed = true;
        }
    }

    for (path, value) in &update.pull {
        if let Some(Bson::Array(items)) = get_path_mut(document, path) {
            let original_len = items.len();
            let target = Comparable::from(value);
            items.retain(|item| Comparable::from(item) != target);
            if items.len() != original_len {
                changed = true;
            }
        }
    }

    changed
}
