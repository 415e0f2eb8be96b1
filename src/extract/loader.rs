//! Extract Loader - resolves logical names to view exports and parses them
//!
//! Exports come out of the warehouse with either `,` or `;` as separator.
//! The separator is probed from the header row in priority order and the
//! first one yielding more than one column wins.

use super::{Extract, ExtractKind};
use crate::config::ViewerConfig;
use crate::error::{ReportError, Result};
use csv::ReaderBuilder;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Separators in probing order.
pub const SEPARATORS: [u8; 2] = [b',', b';'];

pub struct ExtractLoader {
    data_dir: PathBuf,
    files: BTreeMap<ExtractKind, String>,
}

impl ExtractLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            files: ExtractKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_file_name().to_string()))
                .collect(),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut loader = Self::new(config.data_dir.clone());
        for (kind, file) in &config.files {
            loader.files.insert(*kind, file.clone());
        }
        loader
    }

    pub fn resolve_path(&self, kind: ExtractKind) -> PathBuf {
        let file = self
            .files
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_file_name());
        self.data_dir.join(file)
    }

    /// Load one extract from disk.
    pub fn load(&self, kind: ExtractKind) -> Result<Extract> {
        let path = self.resolve_path(kind);
        if !path.exists() {
            return Err(ReportError::FileNotFound { path });
        }

        let separator = detect_separator(&path)?;
        let frame = read_frame(&path, separator)?;
        info!(
            extract = %kind,
            path = %path.display(),
            rows = frame.height(),
            columns = frame.width(),
            "Loaded extract"
        );

        Ok(Extract::new(kind, path, separator, frame))
    }
}

/// Pick the first separator whose header row splits into more than one column.
pub fn detect_separator(path: &Path) -> Result<u8> {
    for separator in SEPARATORS {
        let mut reader = match ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .flexible(true)
            .from_path(path)
        {
            Ok(reader) => reader,
            Err(e) => {
                debug!(path = %path.display(), separator = %(separator as char), "Probe failed: {}", e);
                continue;
            }
        };

        match reader.headers() {
            Ok(headers) if headers.len() > 1 => {
                debug!(path = %path.display(), separator = %(separator as char), "Separator detected");
                return Ok(separator);
            }
            Ok(_) => continue,
            Err(e) => {
                debug!(path = %path.display(), separator = %(separator as char), "Probe failed: {}", e);
            }
        }
    }

    warn!(path = %path.display(), "No separator produced multiple columns, falling back to ','");
    Ok(SEPARATORS[0])
}

fn read_frame(path: &Path, separator: u8) -> Result<DataFrame> {
    let parse_error = |e: PolarsError| ReportError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    // Schema inference is disabled so every column arrives as text.
    LazyCsvReader::new(path)
        .with_separator(separator)
        .with_infer_schema_length(Some(0))
        .with_encoding(CsvEncoding::LossyUtf8)
        .finish()
        .map_err(parse_error)?
        .collect()
        .map_err(parse_error)
}
