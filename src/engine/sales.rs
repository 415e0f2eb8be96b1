//! Sales fact reports over `vendas_nf`

use super::operators::{group_aggregate, safe_ratio, top_n, SortOrder};
use crate::intent::Intent;
use crate::records::SaleRecord;
use crate::report::{
    ExtremeKind, ExtremeSale, GroupRow, Metric, ReportOutput, ReportTable, SellerCustomersRow,
};
use crate::schema::columns;
use rust_decimal::Decimal;

pub const KPI_PREVIEW_ROWS: usize = 25;
pub const PAYMENT_METHOD_LIMIT: usize = 10;
pub const SELLER_LIMIT: usize = 5;
pub const SELLER_CUSTOMERS_LIMIT: usize = 10;

pub const TOTAL_REVENUE: &str = "Total revenue";
pub const SALE_COUNT: &str = "Sale count";
pub const AVERAGE_TICKET: &str = "Average ticket";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    PaymentMethod,
    Salesperson,
}

impl Dimension {
    fn column(&self) -> &'static str {
        match self {
            Dimension::PaymentMethod => columns::PAYMENT_METHOD,
            Dimension::Salesperson => columns::SALESPERSON,
        }
    }

    fn key<'a>(&self, sale: &'a SaleRecord) -> Option<&'a str> {
        match self {
            Dimension::PaymentMethod => sale.payment_method.as_deref(),
            Dimension::Salesperson => sale.salesperson.as_deref(),
        }
    }

    fn limit(&self) -> usize {
        match self {
            Dimension::PaymentMethod => PAYMENT_METHOD_LIMIT,
            Dimension::Salesperson => SELLER_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Revenue,
    SaleCount,
}

fn total_revenue(sales: &[SaleRecord]) -> Decimal {
    sales.iter().filter_map(|s| s.amount).sum()
}

pub fn general_kpis(sales: &[SaleRecord]) -> ReportOutput {
    let revenue = total_revenue(sales);
    let count = sales.len() as u64;

    ReportOutput::new(
        Intent::GeneralKpis,
        ReportTable::Sales(sales.iter().take(KPI_PREVIEW_ROWS).cloned().collect()),
    )
    .with_metrics(vec![
        Metric::money(TOTAL_REVENUE, revenue),
        Metric::count(SALE_COUNT, count),
        Metric::money(AVERAGE_TICKET, safe_ratio(revenue, count)),
    ])
}

/// Highest and lowest valued sale; ties go to the earliest row.
pub fn sale_extremes(sales: &[SaleRecord], has_invoice: bool, has_date: bool) -> ReportOutput {
    let valued: Vec<&SaleRecord> = sales.iter().filter(|s| s.amount.is_some()).collect();

    let pick = |kind: ExtremeKind, order: SortOrder| {
        top_n(valued.clone(), |s| s.amount, order, 1)
            .into_iter()
            .next()
            .and_then(|sale| {
                sale.amount.map(|amount| ExtremeSale {
                    kind,
                    amount,
                    invoice_number: sale.invoice_number.clone(),
                    sale_date: sale.sale_date,
                })
            })
    };

    let rows: Vec<ExtremeSale> = [
        pick(ExtremeKind::Largest, SortOrder::Descending),
        pick(ExtremeKind::Smallest, SortOrder::Ascending),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut output = ReportOutput::new(Intent::SaleExtremes, ReportTable::Extremes(rows));
    if valued.is_empty() {
        output = output.with_note("No sale has a value.");
    }
    if !has_invoice {
        output = output.with_note(format!("Column {} absent.", columns::INVOICE_NUMBER));
    }
    if !has_date {
        output = output.with_note(format!("Column {} absent.", columns::SALE_DATE));
    }
    output
}

/// Group sales by `dimension`, rank by revenue or sale count, keep the top rows.
pub fn grouped_sales(intent: Intent, sales: &[SaleRecord], dimension: Dimension, rank: Rank) -> ReportOutput {
    let groups = group_aggregate(sales, |s| dimension.key(s), |s| s.amount, |_| None);

    let rows: Vec<GroupRow> = groups
        .into_iter()
        .map(|g| GroupRow {
            key: g.key,
            revenue: g.sum,
            sale_count: g.count,
        })
        .collect();

    let rows = match rank {
        Rank::Revenue => top_n(rows, |g| Some(g.revenue), SortOrder::Descending, dimension.limit()),
        Rank::SaleCount => top_n(rows, |g| Some(g.sale_count), SortOrder::Descending, dimension.limit()),
    };

    ReportOutput::new(
        intent,
        ReportTable::Groups {
            dimension: dimension.column().to_string(),
            rows,
        },
    )
}

pub fn distinct_customers_per_seller(sales: &[SaleRecord]) -> ReportOutput {
    let groups = group_aggregate(
        sales,
        |s| s.salesperson.as_deref(),
        |s| s.amount,
        |s| s.customer_id.as_deref(),
    );

    let rows: Vec<SellerCustomersRow> = groups
        .into_iter()
        .map(|g| SellerCustomersRow {
            salesperson: g.key,
            distinct_customers: g.distinct,
            sale_count: g.count,
            revenue: g.sum,
        })
        .collect();

    ReportOutput::new(
        Intent::DistinctCustomersPerSeller,
        ReportTable::SellerCustomers(top_n(
            rows,
            |r| Some(r.distinct_customers),
            SortOrder::Descending,
            SELLER_CUSTOMERS_LIMIT,
        )),
    )
}
