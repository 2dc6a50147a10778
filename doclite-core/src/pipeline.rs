//! Aggregation pipeline specifications.
//!
//! A pipeline is an ordered sequence of stages, each transforming the
//! document sequence produced by the previous stage. The supported stages
//! are `$unwind`, `$group` (distinct grouping key only, no accumulators) and
//! `$sort` (single key). Anything else fails pipeline construction with
//! [`DocumentStoreError::UnsupportedStage`].
//!
//! ```ignore
//! use doclite_core::pipeline::{Pipeline, SortDirection};
//!
//! let pipeline = Pipeline::new()
//!     .unwind("schedule_details.days")
//!     .group("schedule_details.days")
//!     .sort("_id", SortDirection::Asc);
//! ```

use bson::{Bson, Document};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Sort direction for the `$sort` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Sort specification: which field to sort by, and in which direction.
///
/// Documents whose field is absent or null always sort first, regardless of
/// direction.
#[derive(Debug, Clone)]
pub struct SortKey {
    /// The field to sort by.
    pub field: String,
    /// The sort direction, applied to non-null keys only.
    pub direction: SortDirection,
}

/// One aggregation stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Emit one document per element of the sequence at the path; documents
    /// whose value there is not a sequence pass through unchanged.
    Unwind(String),
    /// Emit `{_id: key}` once per distinct resolved key, in first-seen order.
    Group(String),
    /// Stable-sort by the key. `None` is an empty sort specification, which
    /// leaves the sequence unchanged.
    Sort(Option<SortKey>),
}

/// An ordered sequence of aggregation stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// The stages, run left to right.
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates an empty pipeline (passes documents through unchanged).
    pub fn new() -> Self {
        Pipeline::default()
    }

    /// Appends an `$unwind` stage.
    pub fn unwind(mut self, path: impl Into<String>) -> Self {
        self.stages.push(Stage::Unwind(path.into()));
        self
    }

    /// Appends a `$group` stage keyed by the value at `path`.
    pub fn group(mut self, path: impl Into<String>) -> Self {
        self.stages.push(Stage::Group(path.into()));
        self
    }

    /// Appends a `$sort` stage.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.stages.push(Stage::Sort(Some(SortKey {
            field: field.into(),
            direction,
        })));
        self
    }

    /// Parses a Mongo-style pipeline: one single-key document per stage.
    ///
    /// Path values have their leading `$` stripped (`"$days"` addresses the
    /// `days` field); `$group` takes its path from the `_id` entry of its
    /// value. A direction below zero sorts descending, anything else
    /// ascending. An unrecognized stage key is an error, not a skip.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::UnsupportedStage`] naming the offending
    /// stage key.
    pub fn from_documents(stages: &[Document]) -> DocumentStoreResult<Self> {
        let mut pipeline = Pipeline::new();
        for stage in stages {
            if let Some(path) = stage.get("$unwind") {
                pipeline.stages.push(Stage::Unwind(field_path(path)));
            } else if let Some(spec) = stage.get("$group") {
                let path = match spec {
                    Bson::Document(spec) => spec.get("_id").map(field_path).unwrap_or_default(),
                    other => field_path(other),
                };
                pipeline.stages.push(Stage::Group(path));
            } else if let Some(spec) = stage.get("$sort") {
                pipeline.stages.push(Stage::Sort(sort_key(spec)));
            } else {
                let key = stage.keys().next().cloned().unwrap_or_default();
                return Err(DocumentStoreError::UnsupportedStage(key));
            }
        }
        Ok(pipeline)
    }
}

fn field_path(value: &Bson) -> String {
    value
        .as_str()
        .map(|path| path.trim_start_matches('$').to_string())
        .unwrap_or_default()
}

fn sort_key(spec: &Bson) -> Option<SortKey> {
    let spec = spec.as_document()?;
    let (field, direction) = spec.iter().next()?;
    let direction = match direction {
        Bson::Int32(n) => *n as f64,
        Bson::Int64(n) => *n as f64,
        Bson::Double(d) => *d,
        _ => return None,
    };
    Some(SortKey {
        field: field.to_string(),
        direction: if direction < 0.0 {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn parses_unwind_group_sort() {
        let pipeline = Pipeline::from_documents(&[
            doc! { "$unwind": "$schedule_details.days" },
            doc! { "$group": { "_id": "$schedule_details.days" } },
            doc! { "$sort": { "_id": 1 } },
        ])
        .unwrap();

        assert_eq!(pipeline.stages.len(), 3);
        assert!(matches!(&pipeline.stages[0], Stage::Unwind(p) if p == "schedule_details.days"));
        assert!(matches!(&pipeline.stages[1], Stage::Group(p) if p == "schedule_details.days"));
        assert!(matches!(
            &pipeline.stages[2],
            Stage::Sort(Some(SortKey { field, direction: SortDirection::Asc })) if field == "_id"
        ));
    }

    #[test]
    fn negative_direction_sorts_descending() {
        let pipeline = Pipeline::from_documents(&[doc! { "$sort": { "name": -1 } }]).unwrap();
        assert!(matches!(
            &pipeline.stages[0],
            Stage::Sort(Some(SortKey { direction: SortDirection::Desc, .. }))
        ));
    }

    #[test]
    fn empty_sort_spec_is_passthrough() {
        let pipeline = Pipeline::from_documents(&[doc! { "$sort": {} }]).unwrap();
        assert!(matches!(&pipeline.stages[0], Stage::Sort(None)));
    }

    #[test]
    fn unrecognized_stage_is_an_error() {
        let err = Pipeline::from_documents(&[doc! { "$lookup": { "from": "teachers" } }]);
        match err {
            Err(DocumentStoreError::UnsupportedStage(key)) => assert_eq!(key, "$lookup"),
            other => panic!("expected UnsupportedStage, got {other:?}"),
        }
    }
}
