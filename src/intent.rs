//! Report intents - the fixed catalogue of questions the assistant answers

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Help,
    GeneralKpis,
    SaleExtremes,
    BestMonths,
    WorstMonths,
    MonthlySeries,
    DailySeries,
    PaymentMethodRevenue,
    PaymentMethodCount,
    TopSellersByRevenue,
    TopSellersByCount,
    DistinctCustomersPerSeller,
    SellerCustomerMix,
    TopCustomersByValue,
    TopCustomersByPurchases,
    InactiveCustomers,
    StatusCounts,
    HighValueInactive,
    ChurnRisk,
}

impl Intent {
    /// Menu order; the index of each entry is its menu id.
    pub const ALL: [Intent; 19] = [
        Intent::Help,
        Intent::GeneralKpis,
        Intent::SaleExtremes,
        Intent::BestMonths,
        Intent::WorstMonths,
        Intent::MonthlySeries,
        Intent::DailySeries,
        Intent::PaymentMethodRevenue,
        Intent::PaymentMethodCount,
        Intent::TopSellersByRevenue,
        Intent::TopSellersByCount,
        Intent::DistinctCustomersPerSeller,
        Intent::SellerCustomerMix,
        Intent::TopCustomersByValue,
        Intent::TopCustomersByPurchases,
        Intent::InactiveCustomers,
        Intent::StatusCounts,
        Intent::HighValueInactive,
        Intent::ChurnRisk,
    ];

    pub fn id(&self) -> u8 {
        match self {
            Intent::Help => 0,
            Intent::GeneralKpis => 1,
            Intent::SaleExtremes => 2,
            Intent::BestMonths => 3,
            Intent::WorstMonths => 4,
            Intent::MonthlySeries => 5,
            Intent::DailySeries => 6,
            Intent::PaymentMethodRevenue => 7,
            Intent::PaymentMethodCount => 8,
            Intent::TopSellersByRevenue => 9,
            Intent::TopSellersByCount => 10,
            Intent::DistinctCustomersPerSeller => 11,
            Intent::SellerCustomerMix => 12,
            Intent::TopCustomersByValue => 13,
            Intent::TopCustomersByPurchases => 14,
            Intent::InactiveCustomers => 15,
            Intent::StatusCounts => 16,
            Intent::HighValueInactive => 17,
            Intent::ChurnRisk => 18,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Intent::Help => "Help / menu",
            Intent::GeneralKpis => "General KPIs (revenue, sale count, average ticket)",
            Intent::SaleExtremes => "Largest and smallest sale (value, invoice and date)",
            Intent::BestMonths => "Months with highest revenue (Top 12)",
            Intent::WorstMonths => "Months with lowest revenue (Bottom 12)",
            Intent::MonthlySeries => "Monthly revenue series (table + chart)",
            Intent::DailySeries => "Daily revenue series (table + chart)",
            Intent::PaymentMethodRevenue => "Payment methods by revenue (Top 10)",
            Intent::PaymentMethodCount => "Payment methods by sale count (Top 10)",
            Intent::TopSellersByRevenue => "Top 5 sellers by revenue",
            Intent::TopSellersByCount => "Top 5 sellers by sale count",
            Intent::DistinctCustomersPerSeller => "Distinct customers per seller (Top 10)",
            Intent::SellerCustomerMix => "PF/PJ mix per seller (share %)",
            Intent::TopCustomersByValue => "Top 10 customers by total purchased",
            Intent::TopCustomersByPurchases => "Top 10 customers by purchase count",
            Intent::InactiveCustomers => "Inactive customers (Top 20) + last purchase",
            Intent::StatusCounts => "Active vs inactive customers (count)",
            Intent::HighValueInactive => "High-value inactive customers (Top 10) (reactivation)",
            Intent::ChurnRisk => "Longest average time between purchases (Top 15) (churn risk)",
        }
    }

    /// Menu lines, `id - title`.
    pub fn menu() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|intent| format!("{:>2} - {}", intent.id(), intent.title()))
            .collect()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id(), self.title())
    }
}
