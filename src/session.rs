//! Viewer Session - one loader, one extract cache, many report runs

use crate::config::ViewerConfig;
use crate::engine::{run_report, ExtractBundle};
use crate::error::{ReportError, Result};
use crate::extract::{ExtractCache, ExtractKind, ExtractLoader};
use crate::intent::Intent;
use crate::report::ReportOutput;
use crate::schema;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Whether one logical extract resolves to an existing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    pub kind: ExtractKind,
    pub path: PathBuf,
    pub present: bool,
}

pub struct Session {
    loader: ExtractLoader,
    cache: ExtractCache,
}

impl Session {
    pub fn new(loader: ExtractLoader) -> Self {
        Self {
            loader,
            cache: ExtractCache::new(),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(ExtractLoader::from_config(config))
    }

    pub fn cache(&self) -> &ExtractCache {
        &self.cache
    }

    /// Load whatever `intent` reads (cached extracts are not re-read) and
    /// compute the report.
    pub fn run(&mut self, intent: Intent) -> Result<ReportOutput> {
        let kinds = schema::required_extracts(intent);
        let extracts = kinds.len();
        for kind in &kinds {
            self.cache.get_or_load(*kind, &self.loader)?;
        }

        let mut bundle = ExtractBundle::new();
        for kind in kinds {
            let extract = self.cache.get(kind).ok_or(ReportError::ExtractNotLoaded(kind))?;
            bundle.insert(extract);
        }

        info!(intent = intent.id(), extracts, cached = self.cache.len(), "Session run");
        run_report(intent, &bundle)
    }

    /// Every known extract with its resolved path and presence on disk.
    pub fn sources(&self) -> Vec<SourceStatus> {
        ExtractKind::ALL
            .into_iter()
            .map(|kind| {
                let path = self.loader.resolve_path(kind);
                let present = path.is_file();
                SourceStatus { kind, path, present }
            })
            .collect()
    }
}
