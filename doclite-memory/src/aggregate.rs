//! Aggregation pipeline execution over in-memory document sequences.

use std::cmp::Ordering;

use bson::{Bson, Document, doc};
use indexmap::IndexMap;

use doclite_core::{
    document::DocKey,
    path::{get_path, set_path},
    pipeline::{Pipeline, SortDirection, SortKey, Stage},
};

use crate::evaluator::Comparable;

/// Runs `pipeline` stages left to right over `documents`. The input is
/// already a snapshot of independent copies, so stages may consume and
/// rebuild it freely.
pub(crate) fn run_pipeline(documents: Vec<Document>, pipeline: &Pipeline) -> Vec<Document> {
    let mut documents = documents;
    for stage in &pipeline.stages {
        documents = match stage {
            Stage::Unwind(path) => unwind(documents, path),
            Stage::Group(path) => group(documents, path),
            Stage::Sort(Some(key)) => sort(documents, key),
            Stage::Sort(None) => documents,
        };
    }
    documents
}

/// One output document per element of the sequence at `path`, replacing the
/// field with that element; non-sequence values (including absent) pass the
/// document through unchanged.
fn unwind(documents: Vec<Document>, path: &str) -> Vec<Document> {
    let mut unwound = Vec::new();
    for document in documents {
        let items = match get_path(&document, path) {
            Some(Bson::Array(items)) => Some(items.clone()),
            _ => None,
        };
        match items {
            Some(items) => {
                for item in items {
                    let mut copy = document.clone();
                    set_path(&mut copy, path, item);
                    unwound.push(copy);
                }
            }
            None => unwound.push(document),
        }
    }
    unwound
}

/// `{_id: key}` once per distinct resolved key, in first-seen order. An
/// absent grouping field resolves to a null key.
fn group(documents: Vec<Document>, path: &str) -> Vec<Document> {
    let mut keys: IndexMap<DocKey, Bson> = IndexMap::new();
    for document in &documents {
        let key = get_path(document, path).cloned().unwrap_or(Bson::Null);
        keys.entry(DocKey::from(&key)).or_insert(key);
    }
    keys.into_values().map(|key| doc! { "_id": key }).collect()
}

/// Stable sort by the value at the sort field. Documents with an absent or
/// null value there sort before everything else regardless of direction;
/// the direction only orders the remaining documents among themselves.
fn sort(mut documents: Vec<Document>, key: &SortKey) -> Vec<Document> {
    documents.sort_by(|a, b| {
        let left = sort_value(a, &key.field);
        let right = sort_value(b, &key.field);
        match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => {
                let ordering = left.total_cmp(&right);
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        }
    });
    documents
}

fn sort_value<'a>(document: &'a Document, field: &str) -> Comparable<'a> {
    get_path(document, field)
        .map(Comparable::from)
        .unwrap_or(Comparable::Null)
}
