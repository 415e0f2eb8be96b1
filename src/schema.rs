//! Report schemas - which extracts and fields each intent reads
//!
//! Validation happens once, at the engine boundary, before any row is touched.

use crate::error::SchemaError;
use crate::extract::{Extract, ExtractKind};
use crate::intent::Intent;
use std::fmt;

/// Column names as exported by the warehouse views.
pub mod columns {
    pub const SALE_VALUE: &str = "valor_venda";
    pub const SALE_VALUE_FALLBACK: &str = "valor";
    pub const INVOICE_NUMBER: &str = "numero_nf";
    pub const SALE_DATE: &str = "data_venda";
    pub const PAYMENT_METHOD: &str = "forma_pagamento";
    pub const SALESPERSON: &str = "nome_vendedor";
    pub const CUSTOMER_ID: &str = "id_cliente";

    pub const YEAR: &str = "ano";
    pub const MONTH: &str = "mes";
    pub const MONTH_NAME: &str = "mes_extenso";
    pub const REVENUE: &str = "faturamento";
    pub const AVERAGE_TICKET: &str = "ticket_medio";

    pub const DATE: &str = "data";
    pub const SALE_COUNT: &str = "qtd_vendas";

    pub const CUSTOMER_NAME: &str = "nome_cliente";
    pub const TOTAL_PURCHASED: &str = "total_comprado";
    pub const PURCHASE_COUNT: &str = "qtd_compras";
    pub const LAST_PURCHASE: &str = "ultima_compra";

    pub const STATUS_LAST_PURCHASE: &str = "data_ultima_compra";
    pub const CUSTOMER_STATUS: &str = "status_cliente";

    pub const CUSTOMER_TYPE: &str = "tipo_pessoa";
    pub const SHARE_PERCENT: &str = "participacao_pct";

    pub const TOTAL_REVENUE: &str = "faturamento_total";
    pub const AVERAGE_DAYS_BETWEEN: &str = "dias_medios_entre_compras";
}

/// Value-column candidates for the sales extract, in detection order.
pub const VALUE_COLUMN_CANDIDATES: [&str; 2] = [columns::SALE_VALUE, columns::SALE_VALUE_FALLBACK];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    Date,
    Status,
    CustomerType,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::Status => "ativo|inativo",
            FieldType::CustomerType => "PF|PJ",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty }
}

/// Fields one intent needs from one extract.
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequirement {
    pub extract: ExtractKind,
    /// Sales reports first detect the value column among the candidates.
    pub value_column: bool,
    pub fields: &'static [FieldSpec],
}

const MONTHLY_FIELDS: &[FieldSpec] = &[
    field(columns::YEAR, FieldType::Integer),
    field(columns::MONTH, FieldType::Integer),
    field(columns::MONTH_NAME, FieldType::Text),
    field(columns::REVENUE, FieldType::Decimal),
    field(columns::AVERAGE_TICKET, FieldType::Decimal),
];

const DAILY_FIELDS: &[FieldSpec] = &[
    field(columns::DATE, FieldType::Date),
    field(columns::REVENUE, FieldType::Decimal),
    field(columns::SALE_COUNT, FieldType::Integer),
    field(columns::AVERAGE_TICKET, FieldType::Decimal),
];

const PAYMENT_FIELDS: &[FieldSpec] = &[field(columns::PAYMENT_METHOD, FieldType::Text)];

const SELLER_FIELDS: &[FieldSpec] = &[field(columns::SALESPERSON, FieldType::Text)];

const SELLER_CUSTOMER_FIELDS: &[FieldSpec] = &[
    field(columns::SALESPERSON, FieldType::Text),
    field(columns::CUSTOMER_ID, FieldType::Text),
];

const MIX_FIELDS: &[FieldSpec] = &[
    field(columns::SALESPERSON, FieldType::Text),
    field(columns::CUSTOMER_TYPE, FieldType::CustomerType),
    field(columns::SALE_COUNT, FieldType::Integer),
    field(columns::REVENUE, FieldType::Decimal),
    field(columns::SHARE_PERCENT, FieldType::Decimal),
];

const CUSTOMER_RANKING_FIELDS: &[FieldSpec] = &[
    field(columns::CUSTOMER_NAME, FieldType::Text),
    field(columns::TOTAL_PURCHASED, FieldType::Decimal),
    field(columns::PURCHASE_COUNT, FieldType::Integer),
    field(columns::LAST_PURCHASE, FieldType::Date),
];

const INACTIVE_LIST_FIELDS: &[FieldSpec] = &[
    field(columns::CUSTOMER_NAME, FieldType::Text),
    field(columns::STATUS_LAST_PURCHASE, FieldType::Date),
    field(columns::CUSTOMER_STATUS, FieldType::Status),
];

const STATUS_FIELDS: &[FieldSpec] = &[field(columns::CUSTOMER_STATUS, FieldType::Status)];

const REACTIVATION_SUMMARY_FIELDS: &[FieldSpec] = &[
    field(columns::CUSTOMER_ID, FieldType::Text),
    field(columns::CUSTOMER_NAME, FieldType::Text),
    field(columns::TOTAL_PURCHASED, FieldType::Decimal),
];

const REACTIVATION_STATUS_FIELDS: &[FieldSpec] = &[
    field(columns::CUSTOMER_ID, FieldType::Text),
    field(columns::CUSTOMER_STATUS, FieldType::Status),
];

const FREQUENCY_FIELDS: &[FieldSpec] = &[
    field(columns::CUSTOMER_ID, FieldType::Text),
    field(columns::CUSTOMER_NAME, FieldType::Text),
    field(columns::PURCHASE_COUNT, FieldType::Integer),
    field(columns::TOTAL_REVENUE, FieldType::Decimal),
    field(columns::AVERAGE_DAYS_BETWEEN, FieldType::Decimal),
];

const fn sales(fields: &'static [FieldSpec]) -> ExtractRequirement {
    ExtractRequirement {
        extract: ExtractKind::Sales,
        value_column: true,
        fields,
    }
}

const fn plain(extract: ExtractKind, fields: &'static [FieldSpec]) -> ExtractRequirement {
    ExtractRequirement {
        extract,
        value_column: false,
        fields,
    }
}

/// Requirements of an intent, in the order they are checked.
pub fn requirements(intent: Intent) -> Vec<ExtractRequirement> {
    match intent {
        Intent::Help => vec![],
        Intent::GeneralKpis | Intent::SaleExtremes => vec![sales(&[])],
        Intent::BestMonths | Intent::WorstMonths | Intent::MonthlySeries => {
            vec![plain(ExtractKind::MonthlySales, MONTHLY_FIELDS)]
        }
        Intent::DailySeries => vec![plain(ExtractKind::DailySales, DAILY_FIELDS)],
        Intent::PaymentMethodRevenue | Intent::PaymentMethodCount => vec![sales(PAYMENT_FIELDS)],
        Intent::TopSellersByRevenue | Intent::TopSellersByCount => vec![sales(SELLER_FIELDS)],
        Intent::DistinctCustomersPerSeller => vec![sales(SELLER_CUSTOMER_FIELDS)],
        Intent::SellerCustomerMix => vec![plain(ExtractKind::SellerMix, MIX_FIELDS)],
        Intent::TopCustomersByValue | Intent::TopCustomersByPurchases => {
            vec![plain(ExtractKind::CustomerSummary, CUSTOMER_RANKING_FIELDS)]
        }
        Intent::InactiveCustomers => vec![plain(ExtractKind::CustomerStatus, INACTIVE_LIST_FIELDS)],
        Intent::StatusCounts => vec![plain(ExtractKind::CustomerStatus, STATUS_FIELDS)],
        Intent::HighValueInactive => vec![
            plain(ExtractKind::CustomerSummary, REACTIVATION_SUMMARY_FIELDS),
            plain(ExtractKind::CustomerStatus, REACTIVATION_STATUS_FIELDS),
        ],
        Intent::ChurnRisk => vec![plain(ExtractKind::PurchaseFrequency, FREQUENCY_FIELDS)],
    }
}

pub fn required_extracts(intent: Intent) -> Vec<ExtractKind> {
    requirements(intent).into_iter().map(|r| r.extract).collect()
}

/// First value-column candidate present in the sales extract.
pub fn detect_value_column(extract: &Extract) -> Result<&'static str, SchemaError> {
    VALUE_COLUMN_CANDIDATES
        .into_iter()
        .find(|candidate| extract.has_column(candidate))
        .ok_or_else(|| SchemaError::ValueColumnNotDetected {
            extract: extract.display_name(),
            candidates: VALUE_COLUMN_CANDIDATES.iter().map(|c| c.to_string()).collect(),
        })
}

/// Check every field of `fields` is a column of `extract`.
pub fn validate_fields(extract: &Extract, fields: &[FieldSpec]) -> Result<(), SchemaError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|spec| !extract.has_column(spec.name))
        .map(|spec| spec.name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingFields {
            extract: extract.display_name(),
            fields: missing,
        })
    }
}

/// Human-readable requirement lines, for `--schema`.
pub fn describe(intent: Intent) -> Vec<String> {
    requirements(intent)
        .iter()
        .map(|req| {
            let mut parts: Vec<String> = Vec::new();
            if req.value_column {
                parts.push(format!("{} (decimal)", VALUE_COLUMN_CANDIDATES.join(" | ")));
            }
            parts.extend(req.fields.iter().map(|f| format!("{} ({})", f.name, f.ty)));
            format!("{}: {}", req.extract.default_file_name(), parts.join(", "))
        })
        .collect()
}
