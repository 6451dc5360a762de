// File: crates/tabula-core/src/schema.rs
// Summary: Per-column coercion rules and the schema that maps field names to them.

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::record::Value;

/// Literal that a boolean column must match exactly to read as `true`.
pub const DEFAULT_TRUTHY: &str = "True";

fn default_truthy() -> String {
    DEFAULT_TRUTHY.to_string()
}

/// How one raw cell becomes a typed [`Value`].
///
/// Coercion is lenient: a number that does not parse becomes `NaN`, and a boolean
/// cell that is not exactly the configured literal becomes `false`. Neither is an
/// error; both propagate as "no data".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coercion {
    Number,
    Boolean {
        #[serde(default = "default_truthy")]
        truthy: String,
    },
    Category,
}

impl Coercion {
    pub fn boolean() -> Self {
        Coercion::Boolean { truthy: default_truthy() }
    }

    pub fn boolean_with(truthy: impl Into<String>) -> Self {
        Coercion::Boolean { truthy: truthy.into() }
    }

    /// Apply the rule to a raw cell.
    pub fn coerce(&self, raw: &str) -> Value {
        match self {
            Coercion::Number => Value::Number(parse_number(raw)),
            Coercion::Boolean { truthy } => Value::Bool(raw == truthy),
            Coercion::Category => Value::Text(raw.to_string()),
        }
    }

    /// Apply the rule to a value that may already be typed. Idempotent:
    /// `recoerce(recoerce(v)) == recoerce(v)`, and typed values of the rule's own
    /// kind come back unchanged.
    pub fn recoerce(&self, value: &Value) -> Value {
        match (self, value) {
            (Coercion::Number, Value::Number(n)) => Value::Number(*n),
            (Coercion::Number, Value::Bool(b)) => Value::Number(if *b { 1.0 } else { 0.0 }),
            (Coercion::Number, Value::Text(s)) => Value::Number(parse_number(s)),
            (Coercion::Boolean { .. }, Value::Bool(b)) => Value::Bool(*b),
            (Coercion::Boolean { truthy }, Value::Text(s)) => Value::Bool(s == truthy),
            (Coercion::Boolean { .. }, Value::Number(_)) => Value::Bool(false),
            (Coercion::Category, Value::Text(s)) => Value::Text(s.clone()),
            (Coercion::Category, other) => Value::Text(other.to_string()),
        }
    }
}

/// Decimal parsing with surrounding whitespace ignored; empty or malformed cells are NaN.
fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub coercion: Coercion,
}

/// Ordered mapping from field name to coercion rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a repeated name replaces the earlier rule.
    pub fn with(mut self, name: impl Into<String>, coercion: Coercion) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.coercion = coercion,
            None => self.fields.push(Field { name, coercion }),
        }
        self
    }

    pub fn number(self, name: impl Into<String>) -> Self {
        self.with(name, Coercion::Number)
    }

    pub fn boolean(self, name: impl Into<String>) -> Self {
        self.with(name, Coercion::boolean())
    }

    pub fn category(self, name: impl Into<String>) -> Self {
        self.with(name, Coercion::Category)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn coercion(&self, name: &str) -> Option<&Coercion> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.coercion)
    }

    /// Resolve against a header row: header order wins, unlisted columns pass
    /// through as categories, listed fields absent from the header are an error.
    pub fn resolve<'h>(&self, header: impl IntoIterator<Item = &'h str>) -> Result<Schema, LoadError> {
        let header: Vec<&str> = header.into_iter().collect();
        if header.is_empty() {
            return Err(LoadError::EmptyHeader);
        }
        if let Some(missing) = self.fields.iter().find(|f| !header.contains(&f.name.as_str())) {
            return Err(LoadError::MissingColumn(missing.name.clone()));
        }

        let fields = header
            .into_iter()
            .map(|name| Field {
                name: name.to_string(),
                coercion: self.coercion(name).cloned().unwrap_or(Coercion::Category),
            })
            .collect();
        Ok(Schema { fields })
    }
}
