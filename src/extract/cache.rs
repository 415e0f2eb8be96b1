//! Extract Cache - per-session memo of loaded extracts

use super::{Extract, ExtractKind, ExtractLoader};
use crate::error::{ReportError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Loaded extracts keyed by logical name. Entries are never evicted; the
/// cache lives exactly as long as the session that owns it.
#[derive(Debug, Default)]
pub struct ExtractCache {
    entries: HashMap<ExtractKind, Extract>,
}

impl ExtractCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, kind: ExtractKind, loader: &ExtractLoader) -> Result<&Extract> {
        if self.entries.contains_key(&kind) {
            debug!(extract = %kind, "Extract cache hit");
        } else {
            let extract = loader.load(kind)?;
            self.entries.insert(kind, extract);
        }
        self.get(kind).ok_or(ReportError::ExtractNotLoaded(kind))
    }

    pub fn get(&self, kind: ExtractKind) -> Option<&Extract> {
        self.entries.get(&kind)
    }

    pub fn contains(&self, kind: ExtractKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_second_lookup_does_not_reread_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vw_vendas_diarias.csv");
        fs::write(&path, "data,faturamento\n2024-01-01,10\n").unwrap();

        let loader = ExtractLoader::new(dir.path());
        let mut cache = ExtractCache::new();
        assert_eq!(cache.get_or_load(ExtractKind::DailySales, &loader).unwrap().height(), 1);

        // Deleting the file proves the second lookup is served from memory.
        fs::remove_file(&path).unwrap();
        assert_eq!(cache.get_or_load(ExtractKind::DailySales, &loader).unwrap().height(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ExtractLoader::new(dir.path());
        let mut cache = ExtractCache::new();

        assert!(cache.get_or_load(ExtractKind::Sales, &loader).is_err());
        assert!(!cache.contains(ExtractKind::Sales));
        assert!(cache.is_empty());
    }
}
