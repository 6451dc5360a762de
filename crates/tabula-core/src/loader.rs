// File: crates/tabula-core/src/loader.rs
// Summary: Typed record loader; delimited text in, immutable record set out.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::LoadError;
use crate::record::{Record, RecordId, RecordSet, Value};
use crate::schema::{Coercion, Schema};

/// Load comma-delimited text with a header row.
pub fn load(source: &str, schema: &Schema) -> Result<RecordSet, LoadError> {
    Loader::new(schema.clone()).load_str(source)
}

/// Loader settings. Defaults match a plain CSV export: comma delimiter, header row,
/// whitespace trimmed around every cell.
#[derive(Clone, Debug)]
pub struct Loader {
    schema: Schema,
    delimiter: u8,
    trim: bool,
}

impl Loader {
    pub fn new(schema: Schema) -> Self {
        Self { schema, delimiter: b',', trim: true }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn load_str(&self, source: &str) -> Result<RecordSet, LoadError> {
        self.load_reader(source.as_bytes())
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<RecordSet, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let set = self.load_reader(file)?;
        debug!(path = %path.display(), rows = set.len(), "dataset loaded");
        Ok(set)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<RecordSet, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(if self.trim { csv::Trim::All } else { csv::Trim::None })
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let schema = self.schema.resolve(headers.iter().filter(|h| !h.is_empty()))?;
        if schema.len() != headers.len() {
            // an empty header cell cannot be addressed by name
            return Err(LoadError::EmptyHeader);
        }
        let rules: Vec<&Coercion> = schema.fields().iter().map(|f| &f.coercion).collect();

        let mut records = Vec::new();
        let mut shape_warnings = 0usize;
        for (row, result) in rdr.records().enumerate() {
            let raw = result?;
            let values: Vec<Value> = raw
                .iter()
                .zip(&rules)
                .map(|(cell, rule)| {
                    let value = rule.coerce(cell);
                    if value.is_missing() {
                        shape_warnings += 1;
                    }
                    value
                })
                .collect();
            records.push(Record::new(RecordId(row as u32), values));
        }

        if shape_warnings > 0 {
            warn!(cells = shape_warnings, "numeric coercion produced NaN; treated as missing data");
        }
        debug!(rows = records.len(), columns = schema.len(), "records coerced");
        Ok(RecordSet::new(schema, records, shape_warnings))
    }
}
