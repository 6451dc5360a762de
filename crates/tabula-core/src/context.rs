// File: crates/tabula-core/src/context.rs
// Summary: Shared, read-only dataset handle passed to every chart that needs it.

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use crate::error::LoadError;
use crate::loader::Loader;
use crate::record::RecordSet;

/// The loaded dataset plus where it came from. Cloning shares the records.
#[derive(Clone, Debug)]
pub struct DataContext {
    records: Arc<RecordSet>,
    source: Arc<str>,
}

impl DataContext {
    pub fn new(source: impl Into<Arc<str>>, records: RecordSet) -> Self {
        Self { records: Arc::new(records), source: source.into() }
    }

    /// Load once from disk; the only place a context is written.
    pub fn load(loader: &Loader, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let records = loader.load_path(path)?;
        Ok(Self::new(path.display().to_string(), records))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }
}

impl Deref for DataContext {
    type Target = RecordSet;

    fn deref(&self) -> &RecordSet {
        &self.records
    }
}
