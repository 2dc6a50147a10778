//! Query specifications for document matching.
//!
//! A query is a mapping from dotted field path to a *criterion*: either a
//! literal value (equality) or a set of constraints (`$in`, `$gte`, `$lte`).
//! A document matches a query iff it matches every (path, criterion) pair;
//! within a constraint set, every present operator must hold.
//!
//! # Query Building
//!
//! Queries can be constructed with the fluent builder:
//!
//! ```ignore
//! use doclite_core::query::Query;
//!
//! let query = Query::builder()
//!     .any_of("schedule_details.days", ["Monday"])
//!     .gte("max_participants", 10)
//!     .lte("max_participants", 20)
//!     .build();
//! ```
//!
//! or parsed from the Mongo-style wire shape:
//!
//! ```ignore
//! use bson::doc;
//! use doclite_core::query::Query;
//!
//! let query = Query::from_document(&doc! {
//!     "schedule_details.days": { "$in": ["Monday"] },
//!     "max_participants": { "$gte": 10, "$lte": 20 },
//! });
//! ```

use bson::{Bson, Document};

/// Constraint operators applied to a single field.
///
/// Every present operator must hold for the field to match. A field whose
/// resolved value is absent or null never satisfies `gte`/`lte`.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// `$in`: candidate values. A sequence-valued field matches if it shares
    /// at least one element with the candidates; a scalar field matches by
    /// membership. `Some(vec![])` never matches (the shape a malformed `$in`
    /// parses to).
    pub any_of: Option<Vec<Bson>>,
    /// `$gte`: inclusive lower bound.
    pub gte: Option<Bson>,
    /// `$lte`: inclusive upper bound.
    pub lte: Option<Bson>,
}

impl Constraints {
    /// Returns `true` if no operator is present. An empty constraint set
    /// matches everything, mirroring how unrecognized operators are ignored.
    pub fn is_empty(&self) -> bool {
        self.any_of.is_none() && self.gte.is_none() && self.lte.is_none()
    }
}

/// A match rule for one field.
#[derive(Debug, Clone)]
pub enum Criterion {
    /// Structural equality against a literal value.
    Equals(Bson),
    /// One or more `$in`/`$gte`/`$lte` constraints, implicitly ANDed.
    Constraints(Constraints),
}

/// A query specification: dotted field paths, each with a criterion, all of
/// which must match (logical AND). The empty query matches every document.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// The (path, criterion) pairs, in construction order.
    pub fields: Vec<(String, Criterion)>,
}

impl Query {
    /// Creates an empty query that matches all documents.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Parses a Mongo-style query document.
    ///
    /// A sub-document criterion is treated as a constraint set; `$in`,
    /// `$gte` and `$lte` are recognized and any other key is silently
    /// ignored. Every other value is an equality criterion. A `$in` whose
    /// value is not an array parses to an empty candidate list, which can
    /// never match.
    pub fn from_document(document: &Document) -> Self {
        let fields = document
            .iter()
            .map(|(path, value)| {
                let criterion = match value {
                    Bson::Document(spec) => Criterion::Constraints(Constraints {
                        any_of: spec.get("$in").map(|candidates| match candidates {
                            Bson::Array(items) => items.clone(),
                            _ => Vec::new(),
                        }),
                        gte: spec.get("$gte").cloned(),
                        lte: spec.get("$lte").cloned(),
                    }),
                    literal => Criterion::Equals(literal.clone()),
                };
                (path.to_string(), criterion)
            })
            .collect();

        Query { fields }
    }
}

/// Fluent builder for [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder::default()
    }

    /// Adds an equality criterion on `path`.
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.query
            .fields
            .push((path.into(), Criterion::Equals(value.into())));
        self
    }

    /// Adds a `$in` criterion on `path`: the field must share a value with
    /// the candidates.
    pub fn any_of<I, V>(mut self, path: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        self.query.fields.push((
            path.into(),
            Criterion::Constraints(Constraints {
                any_of: Some(candidates.into_iter().map(Into::into).collect()),
                ..Constraints::default()
            }),
        ));
        self
    }

    /// Adds an inclusive lower bound on `path`.
    pub fn gte(mut self, path: impl Into<String>, bound: impl Into<Bson>) -> Self {
        self.query.fields.push((
            path.into(),
            Criterion::Constraints(Constraints {
                gte: Some(bound.into()),
                ..Constraints::default()
            }),
        ));
        self
    }

    /// Adds an inclusive upper bound on `path`.
    pub fn lte(mut self, path: impl Into<String>, bound: impl Into<Bson>) -> Self {
        self.query.fields.push((
            path.into(),
            Criterion::Constraints(Constraints {
                lte: Some(bound.into()),
                ..Constraints::default()
            }),
        ));
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}
