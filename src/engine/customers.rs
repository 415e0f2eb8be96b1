//! Customer and purchase-frequency reports

use super::operators::{left_join, sort_stable, top_n, SortOrder};
use crate::intent::Intent;
use crate::records::{CustomerStatusRecord, CustomerSummary, PurchaseFrequency, SellerMixRecord};
use crate::report::{Chart, ChartKind, ChartPoint, ReactivationRow, ReportOutput, ReportTable, StatusCount};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub const MIX_ROWS: usize = 50;
pub const TOP_CUSTOMERS_LIMIT: usize = 10;
pub const INACTIVE_LIMIT: usize = 20;
pub const REACTIVATION_LIMIT: usize = 10;
pub const CHURN_LIMIT: usize = 15;

/// Label for customers whose status cell is empty.
pub const BLANK_STATUS: &str = "(blank)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerRank {
    TotalPurchased,
    PurchaseCount,
}

/// The seller mix view is already aggregated upstream; show it as delivered.
pub fn seller_mix(mut rows: Vec<SellerMixRecord>) -> ReportOutput {
    rows.truncate(MIX_ROWS);
    ReportOutput::new(Intent::SellerCustomerMix, ReportTable::SellerMix(rows))
}

pub fn top_customers(intent: Intent, customers: Vec<CustomerSummary>, rank: CustomerRank) -> ReportOutput {
    let ranked = match rank {
        CustomerRank::TotalPurchased => {
            top_n(customers, |c| c.total_purchased, SortOrder::Descending, TOP_CUSTOMERS_LIMIT)
        }
        CustomerRank::PurchaseCount => {
            top_n(customers, |c| c.purchase_count, SortOrder::Descending, TOP_CUSTOMERS_LIMIT)
        }
    };
    ReportOutput::new(intent, ReportTable::Customers(ranked))
}

fn is_inactive(status: Option<&crate::records::CustomerStatus>) -> bool {
    status.map(|s| s.is_inactive()).unwrap_or(false)
}

/// Inactive customers, most recent last purchase first.
pub fn inactive_customers(statuses: Vec<CustomerStatusRecord>) -> ReportOutput {
    let inactive: Vec<CustomerStatusRecord> = statuses
        .into_iter()
        .filter(|c| is_inactive(c.status.as_ref()))
        .collect();
    let ranked = top_n(inactive, |c| c.last_purchase, SortOrder::Descending, INACTIVE_LIMIT);
    ReportOutput::new(Intent::InactiveCustomers, ReportTable::Statuses(ranked))
}

/// Customers per title-cased status label, largest group first.
pub fn status_counts(statuses: &[CustomerStatusRecord]) -> ReportOutput {
    let mut counts: Vec<StatusCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in statuses {
        let label = record
            .status
            .as_ref()
            .map(|s| s.label())
            .unwrap_or_else(|| BLANK_STATUS.to_string());
        match positions.get(&label) {
            Some(&i) => counts[i].customers += 1,
            None => {
                positions.insert(label.clone(), counts.len());
                counts.push(StatusCount {
                    status: label,
                    customers: 1,
                });
            }
        }
    }

    sort_stable(&mut counts, |c| Some(c.customers), SortOrder::Descending);

    let points = counts
        .iter()
        .map(|c| ChartPoint {
            label: c.status.clone(),
            value: Decimal::from(c.customers),
        })
        .collect();

    ReportOutput::new(Intent::StatusCounts, ReportTable::StatusCounts(counts)).with_chart(Chart {
        kind: ChartKind::Bar,
        series: "qtd_clientes".to_string(),
        points,
    })
}

/// Customer summary left-joined to status on customer id, inactive only,
/// highest total purchased first.
pub fn high_value_inactive(summaries: &[CustomerSummary], statuses: &[CustomerStatusRecord]) -> ReportOutput {
    let joined = left_join(
        summaries,
        statuses,
        |s| s.customer_id.as_deref(),
        |s| s.customer_id.as_deref(),
    );

    let inactive: Vec<ReactivationRow> = joined
        .into_iter()
        .filter(|(_, status)| is_inactive(status.and_then(|s| s.status.as_ref())))
        .map(|(summary, status)| ReactivationRow {
            customer_id: summary.customer_id.clone(),
            customer_name: summary.customer_name.clone(),
            total_purchased: summary.total_purchased,
            purchase_count: summary.purchase_count,
            last_purchase: summary.last_purchase,
            status: status.and_then(|s| s.status.clone()),
        })
        .collect();

    let ranked = top_n(inactive, |r| r.total_purchased, SortOrder::Descending, REACTIVATION_LIMIT);
    ReportOutput::new(Intent::HighValueInactive, ReportTable::Reactivation(ranked))
}

/// Customers with the longest average gap between purchases. Customers
/// without an average (fewer than two purchases) are left out entirely.
pub fn churn_risk(frequencies: Vec<PurchaseFrequency>) -> ReportOutput {
    let measured: Vec<PurchaseFrequency> = frequencies
        .into_iter()
        .filter(|f| f.average_days_between.is_some())
        .collect();
    let ranked = top_n(measured, |f| f.average_days_between, SortOrder::Descending, CHURN_LIMIT);
    ReportOutput::new(Intent::ChurnRisk, ReportTable::Frequency(ranked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CustomerStatus, CustomerType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn summary(id: &str, name: &str, total: Decimal) -> CustomerSummary {
        CustomerSummary {
            customer_id: Some(id.to_string()),
            customer_name: Some(name.to_string()),
            total_purchased: Some(total),
            purchase_count: Some(1),
            last_purchase: None,
        }
    }

    fn status(id: &str, raw: &str, last: Option<NaiveDate>) -> CustomerStatusRecord {
        CustomerStatusRecord {
            customer_id: Some(id.to_string()),
            customer_name: Some(format!("cliente {id}")),
            last_purchase: last,
            status: Some(CustomerStatus::parse(raw)),
        }
    }

    #[test]
    fn test_inactive_filter_trims_and_ignores_case() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day);
        let statuses = vec![
            status("1", "inativo", d(3)),
            status("2", " INATIVO ", d(9)),
            status("3", "ativo", d(20)),
            status("4", "Inativo", None),
        ];
        let output = inactive_customers(statuses);

        match output.table {
            ReportTable::Statuses(rows) => {
                let ids: Vec<&str> = rows.iter().filter_map(|r| r.customer_id.as_deref()).collect();
                assert_eq!(ids, ["2", "1", "4"]);
            }
            other => panic!("unexpected table: {other:?}"),
        }
    }

    #[test]
    fn test_status_counts_title_case_and_order() {
        let mut statuses = vec![
            status("1", "ativo", None),
            status("2", "INATIVO", None),
            status("3", "inativo", None),
            status("4", "Ativo", None),
            status("5", "em analise", None),
            status("6", "inativo", None),
        ];
        statuses.push(CustomerStatusRecord {
            customer_id: Some("7".to_string()),
            customer_name: None,
            last_purchase: None,
            status: None,
        });
        let output = status_counts(&statuses);

        match &output.table {
            ReportTable::StatusCounts(rows) => {
                let view: Vec<(&str, u64)> = rows.iter().map(|r| (r.status.as_str(), r.customers)).collect();
                assert_eq!(
                    view,
                    [("Inativo", 3), ("Ativo", 2), ("Em Analise", 1), (BLANK_STATUS, 1)]
                );
            }
            other => panic!("unexpected table: {other:?}"),
        }
        let chart = output.chart.unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.points[0].value, dec!(3));
    }

    #[test]
    fn test_high_value_inactive_left_join() {
        let summaries = vec![
            summary("1", "Ana", dec!(500)),
            summary("2", "Bia", dec!(900)),
            summary("3", "Caio", dec!(700)),
            summary("4", "Davi", dec!(1000)),
        ];
        // Customer 4 has no status row: kept by the join, dropped by the filter.
        let statuses = vec![
            status("1", "inativo", None),
            status("2", "ativo", None),
            status("3", "INATIVO", None),
        ];

        let joined = left_join(&summaries, &statuses, |s| s.customer_id.as_deref(), |s| s.customer_id.as_deref());
        assert_eq!(joined.len(), summaries.len());
        assert!(joined[3].1.is_none());

        let output = high_value_inactive(&summaries, &statuses);
        match output.table {
            ReportTable::Reactivation(rows) => {
                let names: Vec<&str> = rows.iter().filter_map(|r| r.customer_name.as_deref()).collect();
                assert_eq!(names, ["Caio", "Ana"]);
                assert!(rows.iter().all(|r| r.status == Some(CustomerStatus::Inactive)));
            }
            other => panic!("unexpected table: {other:?}"),
        }
    }

    #[test]
    fn test_churn_excludes_null_average() {
        let frequency = |id: &str, days: Option<Decimal>| PurchaseFrequency {
            customer_id: Some(id.to_string()),
            customer_name: None,
            purchase_count: Some(2),
            total_revenue: Some(dec!(10)),
            average_days_between: days,
        };
        let mut rows: Vec<PurchaseFrequency> = vec![frequency("null-1", None)];
        for i in 0..20 {
            rows.push(frequency(&format!("c{i}"), Some(Decimal::from(i))));
        }
        rows.push(frequency("null-2", None));

        let output = churn_risk(rows);
        match output.table {
            ReportTable::Frequency(rows) => {
                assert_eq!(rows.len(), CHURN_LIMIT);
                assert_eq!(rows[0].customer_id.as_deref(), Some("c19"));
                assert!(rows.iter().all(|r| r.average_days_between.is_some()));
            }
            other => panic!("unexpected table: {other:?}"),
        }
    }

    #[test]
    fn test_seller_mix_is_capped_at_50() {
        let rows: Vec<SellerMixRecord> = (0..60)
            .map(|i| SellerMixRecord {
                salesperson: Some(format!("vendedor {i}")),
                customer_type: Some(CustomerType::parse(if i % 2 == 0 { "PF" } else { "PJ" })),
                sale_count: Some(i),
                revenue: Some(Decimal::from(i)),
                share_percent: Some(dec!(1.5)),
            })
            .collect();

        let output = seller_mix(rows.clone());
        match output.table {
            ReportTable::SellerMix(mix) => {
                assert_eq!(mix.len(), MIX_ROWS);
                assert_eq!(mix[..], rows[..MIX_ROWS]);
            }
            other => panic!("unexpected table: {other:?}"),
        }
    }

    #[test]
    fn test_top_customers_by_count() {
        let mut customers = vec![summary("1", "Ana", dec!(1)), summary("2", "Bia", dec!(2))];
        customers[0].purchase_count = Some(8);
        customers[1].purchase_count = Some(3);

        let output = top_customers(Intent::TopCustomersByPurchases, customers.clone(), CustomerRank::PurchaseCount);
        assert_eq!(output.table, ReportTable::Customers(customers.clone()));

        let output = top_customers(Intent::TopCustomersByValue, customers.clone(), CustomerRank::TotalPurchased);
        customers.reverse();
        assert_eq!(output.table, ReportTable::Customers(customers));
    }
}
