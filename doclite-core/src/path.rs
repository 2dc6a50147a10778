//! Dotted-path resolution over nested documents.
//!
//! A path like `"schedule_details.days"` addresses a value inside nested
//! mappings. Resolution is centralized here so the evaluator, applier and
//! aggregation stages all agree on what "absent" means: any intermediate
//! segment that is missing or not a mapping.

use bson::{Bson, Document};

/// Resolves the value at `path`, or `None` if any segment is missing or an
/// intermediate segment is not a mapping.
pub fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let parts: Vec<&str> = path.split('.').collect();
    let (last, intermediate) = parts.split_last()?;

    let mut current = document;
    for part in intermediate {
        match current.get(*part) {
            Some(Bson::Document(next)) => current = next,
            _ => return None,
        }
    }

    current.get(*last)
}

/// Mutable variant of [`get_path`]. Never creates missing segments.
pub fn get_path_mut<'a>(document: &'a mut Document, path: &str) -> Option<&'a mut Bson> {
    let parts: Vec<&str> = path.split('.').collect();
    let (last, intermediate) = parts.split_last()?;

    let mut current = document;
    for part in intermediate {
        match current.get_mut(*part) {
            Some(Bson::Document(next)) => current = next,
            _ => return None,
        }
    }

    current.get_mut(*last)
}

/// Assigns `value` at `path`, creating an empty mapping at every missing or
/// non-mapping intermediate segment. This is the only way nested fields come
/// into existence.
pub fn set_path(document: &mut Document, path: &str, value: Bson) {
    let parts: Vec<&str> = path.split('.').collect();
    let Some((last, intermediate)) = parts.split_last() else {
        return;
    };

    let mut current = document;
    for part in intermediate {
        if !matches!(current.get(*part), Some(Bson::Document(_))) {
            current.insert(part.to_string(), Document::new());
        }
        current = match current.get_mut(*part) {
            Some(Bson::Document(next)) => next,
            _ => unreachable!(), // inserted a mapping above
        };
    }

    current.insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_top_level_and_nested() {
        let doc = doc! {
            "name": "Chess Club",
            "schedule_details": { "days": ["Monday", "Friday"], "start_time": "15:15" },
        };

        assert_eq!(get_path(&doc, "name"), Some(&Bson::String("Chess Club".to_string())));
        assert_eq!(
            get_path(&doc, "schedule_details.start_time"),
            Some(&Bson::String("15:15".to_string()))
        );
        assert_eq!(get_path(&doc, "schedule_details.end_time"), None);
        assert_eq!(get_path(&doc, "missing.anything"), None);
    }

    #[test]
    fn non_mapping_intermediate_is_absent() {
        let doc = doc! { "name": "Chess Club" };
        assert_eq!(get_path(&doc, "name.inner"), None);
    }

    #[test]
    fn set_creates_intermediate_mappings() {
        let mut doc = doc! { "_id": "a" };
        set_path(&mut doc, "schedule_details.days", Bson::Array(vec!["Monday".into()]));
        assert_eq!(
            doc,
            doc! { "_id": "a", "schedule_details": { "days": ["Monday"] } }
        );
    }

    #[test]
    fn set_overwrites_non_mapping_intermediate() {
        let mut doc = doc! { "schedule_details": "Mondays at 3" };
        set_path(&mut doc, "schedule_details.start_time", "15:15".into());
        assert_eq!(doc, doc! { "schedule_details": { "start_time": "15:15" } });
    }

    #[test]
    fn get_path_mut_allows_in_place_edits() {
        let mut doc = doc! { "participants": ["a@x.edu"] };
        if let Some(Bson::Array(items)) = get_path_mut(&mut doc, "participants") {
            items.push("b@x.edu".into());
        }
        assert_eq!(doc, doc! { "participants": ["a@x.edu", "b@x.edu"] });
    }
}
