//! Extracts - read-only tabular snapshots exported from the warehouse views
//!
//! Every column is held as text; typing happens in `records` once the
//! schema has been validated for the report being run.

pub mod cache;
pub mod loader;

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub use cache::ExtractCache;
pub use loader::ExtractLoader;

/// Logical dataset names, one per upstream view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExtractKind {
    #[serde(rename = "vendas_nf")]
    Sales,
    #[serde(rename = "vendas_mensais")]
    MonthlySales,
    #[serde(rename = "margem_30_mes")]
    MonthlyMargin,
    #[serde(rename = "cliente_resumo")]
    CustomerSummary,
    #[serde(rename = "ativos_inativos")]
    CustomerStatus,
    #[serde(rename = "vendas_diarias")]
    DailySales,
    #[serde(rename = "mix_cliente_tipo_vendedor")]
    SellerMix,
    #[serde(rename = "frequencia_cliente")]
    PurchaseFrequency,
}

impl ExtractKind {
    pub const ALL: [ExtractKind; 8] = [
        ExtractKind::Sales,
        ExtractKind::MonthlySales,
        ExtractKind::MonthlyMargin,
        ExtractKind::CustomerSummary,
        ExtractKind::CustomerStatus,
        ExtractKind::DailySales,
        ExtractKind::SellerMix,
        ExtractKind::PurchaseFrequency,
    ];

    pub fn logical_name(&self) -> &'static str {
        match self {
            ExtractKind::Sales => "vendas_nf",
            ExtractKind::MonthlySales => "vendas_mensais",
            ExtractKind::MonthlyMargin => "margem_30_mes",
            ExtractKind::CustomerSummary => "cliente_resumo",
            ExtractKind::CustomerStatus => "ativos_inativos",
            ExtractKind::DailySales => "vendas_diarias",
            ExtractKind::SellerMix => "mix_cliente_tipo_vendedor",
            ExtractKind::PurchaseFrequency => "frequencia_cliente",
        }
    }

    /// File name of the view export when no override is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExtractKind::Sales => "vw_vendas_nf.csv",
            ExtractKind::MonthlySales => "vw_vendas_mensais.csv",
            ExtractKind::MonthlyMargin => "vw_margem_30_mes.csv",
            ExtractKind::CustomerSummary => "vw_cliente_resumo.csv",
            ExtractKind::CustomerStatus => "vw_clientes_ativos_inativos.csv",
            ExtractKind::DailySales => "vw_vendas_diarias.csv",
            ExtractKind::SellerMix => "vw_mix_cliente_tipo_por_vendedor.csv",
            ExtractKind::PurchaseFrequency => "vw_frequencia_cliente.csv",
        }
    }
}

impl fmt::Display for ExtractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.logical_name())
    }
}

/// A loaded extract.
#[derive(Debug, Clone)]
pub struct Extract {
    kind: ExtractKind,
    path: PathBuf,
    separator: u8,
    frame: DataFrame,
}

impl Extract {
    pub fn new(kind: ExtractKind, path: PathBuf, separator: u8, frame: DataFrame) -> Self {
        Self {
            kind,
            path,
            separator,
            frame,
        }
    }

    /// Wrap an in-memory frame, named after the default export file.
    pub fn from_frame(kind: ExtractKind, frame: DataFrame) -> Self {
        Self::new(kind, PathBuf::from(kind.default_file_name()), b',', frame)
    }

    pub fn kind(&self) -> ExtractKind {
        self.kind
    }

    pub fn separator(&self) -> u8 {
        self.separator
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Name used in user-facing messages: the file name when known.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.kind.default_file_name().to_string())
    }

    pub fn columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_names().iter().any(|c| *c == name)
    }

    /// Column cells as trimmed text; empty cells become `None`.
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let series = self.frame.column(name)?.cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|cell| {
                cell.map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
            .collect();
        Ok(values)
    }

    /// Like `text_column`, but an absent column yields `None` instead of an error.
    pub fn optional_text_column(&self, name: &str) -> Result<Option<Vec<Option<String>>>> {
        if self.has_column(name) {
            self.text_column(name).map(Some)
        } else {
            Ok(None)
        }
    }
}
