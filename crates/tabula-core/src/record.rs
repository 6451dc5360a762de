// File: crates/tabula-core/src/record.rs
// Summary: Typed values, records, the immutable record set and resolved column accessors.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{ChartError, Result};
use crate::schema::{Coercion, Schema};

/// One typed cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Numeric view; text parses leniently, booleans read as 1/0.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// The NaN sentinel a failed numeric coercion leaves behind.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Row ordinal assigned at load time. Stable across filtering and reordering,
/// which makes it the identity key for marks bound to records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    id: RecordId,
    values: Box<[Value]>,
}

impl Record {
    pub(crate) fn new(id: RecordId, values: Vec<Value>) -> Self {
        Self { id, values: values.into_boxed_slice() }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// All records of one dataset, sharing one resolved schema. Immutable once built.
#[derive(Debug)]
pub struct RecordSet {
    schema: Arc<Schema>,
    records: Vec<Record>,
    shape_warnings: usize,
}

impl RecordSet {
    pub(crate) fn new(schema: Schema, records: Vec<Record>, shape_warnings: usize) -> Self {
        Self { schema: Arc::new(schema), records, shape_warnings }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        // ids are dense row ordinals
        self.records.get(id.0 as usize).filter(|r| r.id == id)
    }

    /// Number of numeric cells that coerced to the NaN sentinel.
    pub fn shape_warnings(&self) -> usize {
        self.shape_warnings
    }

    /// Resolve a field name once; the returned accessor is cheap to clone.
    pub fn column(&self, name: &str) -> Result<Column> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| ChartError::UnknownField(name.to_string()))?;
        Ok(Column { index, name: Arc::from(name) })
    }

    /// Records passing `predicate`, in load order.
    pub fn subset<P>(&self, mut predicate: P) -> Vec<&Record>
    where
        P: FnMut(&Record) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Re-apply the schema's coercions to every record. Idempotent on loaded data.
    pub fn recoerced(&self) -> Vec<Vec<Value>> {
        let rules: Vec<&Coercion> = self.schema.fields().iter().map(|f| &f.coercion).collect();
        self.records
            .iter()
            .map(|r| r.values.iter().zip(&rules).map(|(v, rule)| rule.recoerce(v)).collect())
            .collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A field resolved against a record set's schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    index: usize,
    name: Arc<str>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        record.get(self.index)
    }

    pub fn number(&self, record: &Record) -> f64 {
        self.value(record).map_or(f64::NAN, Value::as_number)
    }

    pub fn text<'r>(&self, record: &'r Record) -> Cow<'r, str> {
        self.value(record).map_or(Cow::Borrowed(""), Value::as_text)
    }

    pub fn boolean(&self, record: &Record) -> bool {
        self.value(record).is_some_and(Value::as_bool)
    }
}
