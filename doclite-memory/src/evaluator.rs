//! Query evaluation for in-memory document matching.
//!
//! This module decides whether a document satisfies a query specification.
//! Matching is deliberately permissive: comparing values of different tags,
//! or against null, is a defined non-match, never an error.

use std::{cmp::Ordering, collections::HashMap};

use bson::{Bson, Document};

use doclite_core::{
    path::get_path,
    query::{Constraints, Criterion, Query},
};

/// Type-erased, comparable representation of document values.
///
/// This enum wraps borrowed BSON values and gives them the value model's
/// equality and ordering: numbers of any width normalize to f64, equality is
/// structural, and ordering is only defined number-to-number and
/// string-to-string. Tags outside the value model collapse to null.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value (also the image of absent fields and unsupported tags)
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl<'a> Comparable<'a> {
    pub(crate) fn is_null(&self) -> bool {
        matches!(self, Comparable::Null)
    }

    /// Total, stable ordering used by the `$sort` stage.
    ///
    /// Within a tag: natural order (f64 total order for numbers, element-wise
    /// for arrays, sorted-key entry-wise for maps). Across tags: a fixed tag
    /// rank. This order is an implementation detail; only its totality and
    /// stability are contractual.
    pub(crate) fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.total_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.cmp(b),
            (Comparable::Array(a), Comparable::Array(b)) => {
                for (left, right) in a.iter().zip(b.iter()) {
                    let ordering = left.total_cmp(right);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Comparable::Map(a), Comparable::Map(b)) => {
                let mut left: Vec<_> = a.iter().collect();
                let mut right: Vec<_> = b.iter().collect();
                left.sort_by_key(|(k, _)| *k);
                right.sort_by_key(|(k, _)| *k);
                for ((lk, lv), (rk, rv)) in left.iter().zip(right.iter()) {
                    let ordering = lk.cmp(rk).then_with(|| lv.total_cmp(rv));
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                left.len().cmp(&right.len())
            }
            _ => self.tag_rank().cmp(&other.tag_rank()),
        }
    }

    fn tag_rank(&self) -> u8 {
        match self {
            Comparable::Null => 0,
            Comparable::Bool(_) => 1,
            Comparable::Number(_) => 2,
            Comparable::String(_) => 3,
            Comparable::Array(_) => 4,
            Comparable::Map(_) => 5,
        }
    }
}

/// Returns `true` iff `document` satisfies every (path, criterion) pair of
/// `query`. The empty query matches everything.
pub(crate) fn matches_document(document: &Document, query: &Query) -> bool {
    query
        .fields
        .iter()
        .all(|(path, criterion)| matches_criterion(get_path(document, path), criterion))
}

fn matches_criterion(value: Option<&Bson>, criterion: &Criterion) -> bool {
    // Absent fields compare as null.
    let value = value.unwrap_or(&Bson::Null);
    match criterion {
        Criterion::Equals(expected) => Comparable::from(value) == Comparable::from(expected),
        Criterion::Constraints(constraints) => matches_constraints(value, constraints),
    }
}

fn matches_constraints(value: &Bson, constraints: &Constraints) -> bool {
    let Constraints { any_of, gte, lte } = constraints;

    if let Some(candidates) = any_of {
        let member = match Comparable::from(value) {
            // A sequence field matches if it intersects the candidates.
            Comparable::Array(items) => items
                .iter()
                .any(|item| candidates.iter().any(|c| item == &Comparable::from(c))),
            scalar => candidates.iter().any(|c| scalar == Comparable::from(c)),
        };
        if !member {
            return false;
        }
    }

    if let Some(bound) = gte {
        match Comparable::from(value).partial_cmp(&Comparable::from(bound)) {
            Some(Ordering::Less) | None => return false,
            _ => {}
        }
    }

    if let Some(bound) = lte {
        match Comparable::from(value).partial_cmp(&Comparable::from(bound)) {
            Some(Ordering::Greater) | None => return false,
            _ => {}
        }
    }

    true
}
