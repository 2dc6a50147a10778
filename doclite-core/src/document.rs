//! Document helpers and the primary-key representation.
//!
//! Documents are plain [`bson::Document`] values: string-keyed mappings whose
//! values follow the store's value model (null, boolean, number, string,
//! array, nested mapping). The one reserved field is `_id`, the document's
//! primary key.

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde_json::Value;

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// The reserved primary-key field of every stored document.
pub const ID_FIELD: &str = "_id";

/// Extension trait providing `_id` access and JSON conversion for documents.
///
/// This trait is implemented for [`bson::Document`]. The JSON conversions are
/// convenient for callers whose seed data or fixtures live as JSON.
pub trait DocumentExt: Sized {
    /// Returns the document's `_id` value, or `None` if it has no `_id` field.
    fn id(&self) -> Option<&Bson>;

    /// Converts this document to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object or conversion fails.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl DocumentExt for Document {
    fn id(&self) -> Option<&Bson> {
        self.get(ID_FIELD)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        match serialize_to_bson(&value)? {
            Bson::Document(doc) => Ok(doc),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}

/// Deserializes a document back into a typed value.
///
/// The inverse of storing serde-serializable data as a document.
pub fn from_document<T>(document: Document) -> DocumentStoreResult<T>
where
    T: serde::de::DeserializeOwned,
{
    Ok(deserialize_from_bson(Bson::Document(document))?)
}

/// A hashable, owned form of a document's `_id` value.
///
/// The store map and `$group` bookkeeping both need primary keys that can be
/// hashed and compared; `Bson` itself cannot. Two `_id` values map to the
/// same `DocKey` iff they are structurally equal under the value model, with
/// all numeric widths normalized (`1`, `1i64` and `1.0` share a key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocKey {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern of a non-integral double. NaN is canonicalized so all NaN
    /// keys collide.
    Double(u64),
    String(String),
    Array(Vec<DocKey>),
    Document(Vec<(String, DocKey)>),
}

impl From<&Bson> for DocKey {
    fn from(value: &Bson) -> Self {
        match value {
            Bson::Boolean(b) => DocKey::Bool(*b),
            Bson::Int32(n) => DocKey::Int(*n as i64),
            Bson::Int64(n) => DocKey::Int(*n),
            Bson::Double(d) => float_key(*d),
            Bson::String(s) => DocKey::String(s.clone()),
            Bson::Array(items) => DocKey::Array(items.iter().map(DocKey::from).collect()),
            Bson::Document(doc) => DocKey::Document(
                doc.iter()
                    .map(|(k, v)| (k.clone(), DocKey::from(v)))
                    .collect(),
            ),
            // Null and every tag outside the value model
            _ => DocKey::Null,
        }
    }
}

fn float_key(d: f64) -> DocKey {
    if d.is_nan() {
        return DocKey::Double(f64::NAN.to_bits());
    }
    // Integral doubles share a key with the equivalent integer.
    if d.fract() == 0.0 && d >= i64::MIN as f64 && d <= i64::MAX as f64 {
        return DocKey::Int(d as i64);
    }
    DocKey::Double(d.to_bits())
}
