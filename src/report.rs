//! Report output - typed result tables, scalar metrics and chart series

use crate::intent::Intent;
use crate::records::{
    CustomerStatus, CustomerStatusRecord, CustomerSummary, DailyAggregate, PurchaseFrequency,
    SaleRecord, SellerMixRecord,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Money(Decimal),
    Count(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn money(label: &str, value: Decimal) -> Self {
        Self {
            label: label.to_string(),
            value: MetricValue::Money(value),
        }
    }

    pub fn count(label: &str, value: u64) -> Self {
        Self {
            label: label.to_string(),
            value: MetricValue::Count(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremeKind {
    Largest,
    Smallest,
}

/// A single sale picked by the largest/smallest report. Invoice and date are
/// `None` both when the cell is empty and when the column is absent; the
/// report notes say which.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeSale {
    pub kind: ExtremeKind,
    pub amount: Decimal,
    pub invoice_number: Option<String>,
    pub sale_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub period: String,
    pub month_name: Option<String>,
    pub revenue: Option<Decimal>,
    pub average_ticket: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: String,
    pub revenue: Decimal,
    pub sale_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerCustomersRow {
    pub salesperson: String,
    pub distinct_customers: u64,
    pub sale_count: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub customers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactivationRow {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub total_purchased: Option<Decimal>,
    pub purchase_count: Option<i64>,
    pub last_purchase: Option<NaiveDate>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum ReportTable {
    Empty,
    Sales(Vec<SaleRecord>),
    Extremes(Vec<ExtremeSale>),
    Months(Vec<MonthRow>),
    Days(Vec<DailyAggregate>),
    /// Grouped sales; `dimension` is the grouping column.
    Groups {
        dimension: String,
        rows: Vec<GroupRow>,
    },
    SellerCustomers(Vec<SellerCustomersRow>),
    SellerMix(Vec<SellerMixRecord>),
    Customers(Vec<CustomerSummary>),
    Statuses(Vec<CustomerStatusRecord>),
    StatusCounts(Vec<StatusCount>),
    Reactivation(Vec<ReactivationRow>),
    Frequency(Vec<PurchaseFrequency>),
}

impl ReportTable {
    pub fn len(&self) -> usize {
        match self {
            ReportTable::Empty => 0,
            ReportTable::Sales(rows) => rows.len(),
            ReportTable::Extremes(rows) => rows.len(),
            ReportTable::Months(rows) => rows.len(),
            ReportTable::Days(rows) => rows.len(),
            ReportTable::Groups { rows, .. } => rows.len(),
            ReportTable::SellerCustomers(rows) => rows.len(),
            ReportTable::SellerMix(rows) => rows.len(),
            ReportTable::Customers(rows) => rows.len(),
            ReportTable::Statuses(rows) => rows.len(),
            ReportTable::StatusCounts(rows) => rows.len(),
            ReportTable::Reactivation(rows) => rows.len(),
            ReportTable::Frequency(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub series: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutput {
    pub intent: Intent,
    pub title: String,
    /// File names of the extracts the report read.
    pub sources: Vec<String>,
    pub metrics: Vec<Metric>,
    pub table: ReportTable,
    pub chart: Option<Chart>,
    pub notes: Vec<String>,
}

impl ReportOutput {
    pub fn new(intent: Intent, table: ReportTable) -> Self {
        Self {
            intent,
            title: intent.title().to_string(),
            sources: Vec::new(),
            metrics: Vec::new(),
            table,
            chart: None,
            notes: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_chart(mut self, chart: Chart) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn metric(&self, label: &str) -> Option<&MetricValue> {
        self.metrics.iter().find(|m| m.label == label).map(|m| &m.value)
    }
}
