//! In-memory collaborators for tests, demos and single-process deployments.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use super::collaborators::{BackendError, DocumentStore, IssuerRegistry, StoredDocument};
use crate::core::Clave;

/// A fixed set of registered issuers.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    issuers: HashSet<String>,
}

impl StaticRegistry {
    pub fn new<I, S>(issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            issuers: issuers.into_iter().map(Into::into).collect(),
        }
    }
}

impl IssuerRegistry for StaticRegistry {
    async fn exists(&self, tax_id: &str) -> Result<bool, BackendError> {
        Ok(self.issuers.contains(tax_id))
    }
}

/// Stores submissions in a map keyed by clave.
///
/// Saving under an existing clave replaces the earlier row.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<Clave, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, clave: &Clave) -> Option<StoredDocument> {
        self.rows.lock().get(clave).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    /// All stored rows, in no particular order.
    pub fn rows(&self) -> Vec<StoredDocument> {
        self.rows.lock().values().cloned().collect()
    }
}

impl DocumentStore for MemoryStore {
    async fn save(&self, record: StoredDocument) -> Result<(), BackendError> {
        self.rows.lock().insert(record.clave.clone(), record);
        Ok(())
    }
}
