//! Report Query Engine
//!
//! `run_report` validates the extracts an intent reads, decodes them into
//! typed records and applies the intent's operator chain. It is a pure
//! function of its inputs: nothing is cached or written here.

pub mod customers;
pub mod operators;
pub mod periods;
pub mod sales;

use crate::error::{ReportError, Result};
use crate::extract::{Extract, ExtractKind};
use crate::intent::Intent;
use crate::records;
use crate::report::{ReportOutput, ReportTable};
use crate::schema;
use std::collections::HashMap;
use tracing::{debug, info};

/// Borrowed extracts made available to one report run.
#[derive(Debug, Default, Clone)]
pub struct ExtractBundle<'a> {
    extracts: HashMap<ExtractKind, &'a Extract>,
}

impl<'a> ExtractBundle<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, extract: &'a Extract) -> Self {
        self.insert(extract);
        self
    }

    pub fn insert(&mut self, extract: &'a Extract) {
        self.extracts.insert(extract.kind(), extract);
    }

    pub fn get(&self, kind: ExtractKind) -> Result<&'a Extract> {
        self.extracts
            .get(&kind)
            .copied()
            .ok_or(ReportError::ExtractNotLoaded(kind))
    }

}

/// Extracts that passed validation for one intent.
struct ValidatedInputs<'a> {
    extracts: Vec<&'a Extract>,
    value_column: Option<&'static str>,
}

impl<'a> ValidatedInputs<'a> {
    fn extract(&self, kind: ExtractKind) -> Result<&'a Extract> {
        self.extracts
            .iter()
            .copied()
            .find(|e| e.kind() == kind)
            .ok_or(ReportError::ExtractNotLoaded(kind))
    }

    fn sales(&self) -> Result<Vec<records::SaleRecord>> {
        let extract = self.extract(ExtractKind::Sales)?;
        let value_column = match self.value_column {
            Some(column) => column,
            None => schema::detect_value_column(extract)?,
        };
        records::decode_sales(extract, value_column)
    }

    fn source_names(&self) -> Vec<String> {
        self.extracts.iter().map(|e| e.display_name()).collect()
    }
}

/// Check every requirement of `intent` against the bundle. Nothing is
/// decoded until all extracts have passed.
fn validate<'a>(intent: Intent, bundle: &ExtractBundle<'a>) -> Result<ValidatedInputs<'a>> {
    let mut inputs = ValidatedInputs {
        extracts: Vec::new(),
        value_column: None,
    };

    for requirement in schema::requirements(intent) {
        let extract = bundle.get(requirement.extract)?;
        if requirement.value_column {
            let column = schema::detect_value_column(extract)?;
            debug!(extract = %requirement.extract, column, "Detected value column");
            inputs.value_column = Some(column);
        }
        schema::validate_fields(extract, requirement.fields)?;
        inputs.extracts.push(extract);
    }

    Ok(inputs)
}

pub fn run_report(intent: Intent, bundle: &ExtractBundle<'_>) -> Result<ReportOutput> {
    info!(intent = intent.id(), title = intent.title(), "Running report");
    let inputs = validate(intent, bundle)?;

    let output = match intent {
        Intent::Help => help(),
        Intent::GeneralKpis => sales::general_kpis(&inputs.sales()?),
        Intent::SaleExtremes => {
            let extract = inputs.extract(ExtractKind::Sales)?;
            sales::sale_extremes(
                &inputs.sales()?,
                extract.has_column(schema::columns::INVOICE_NUMBER),
                extract.has_column(schema::columns::SALE_DATE),
            )
        }
        Intent::BestMonths => {
            periods::best_months(records::decode_monthly(inputs.extract(ExtractKind::MonthlySales)?)?)
        }
        Intent::WorstMonths => {
            periods::worst_months(records::decode_monthly(inputs.extract(ExtractKind::MonthlySales)?)?)
        }
        Intent::MonthlySeries => {
            periods::monthly_series(records::decode_monthly(inputs.extract(ExtractKind::MonthlySales)?)?)
        }
        Intent::DailySeries => {
            periods::daily_series(records::decode_daily(inputs.extract(ExtractKind::DailySales)?)?)
        }
        Intent::PaymentMethodRevenue => {
            sales::grouped_sales(intent, &inputs.sales()?, sales::Dimension::PaymentMethod, sales::Rank::Revenue)
        }
        Intent::PaymentMethodCount => {
            sales::grouped_sales(intent, &inputs.sales()?, sales::Dimension::PaymentMethod, sales::Rank::SaleCount)
        }
        Intent::TopSellersByRevenue => {
            sales::grouped_sales(intent, &inputs.sales()?, sales::Dimension::Salesperson, sales::Rank::Revenue)
        }
        Intent::TopSellersByCount => {
            sales::grouped_sales(intent, &inputs.sales()?, sales::Dimension::Salesperson, sales::Rank::SaleCount)
        }
        Intent::DistinctCustomersPerSeller => sales::distinct_customers_per_seller(&inputs.sales()?),
        Intent::SellerCustomerMix => {
            customers::seller_mix(records::decode_seller_mix(inputs.extract(ExtractKind::SellerMix)?)?)
        }
        Intent::TopCustomersByValue => customers::top_customers(
            intent,
            records::decode_customer_summaries(inputs.extract(ExtractKind::CustomerSummary)?)?,
            customers::CustomerRank::TotalPurchased,
        ),
        Intent::TopCustomersByPurchases => customers::top_customers(
            intent,
            records::decode_customer_summaries(inputs.extract(ExtractKind::CustomerSummary)?)?,
            customers::CustomerRank::PurchaseCount,
        ),
        Intent::InactiveCustomers => customers::inactive_customers(records::decode_customer_statuses(
            inputs.extract(ExtractKind::CustomerStatus)?,
        )?),
        Intent::StatusCounts => customers::status_counts(&records::decode_customer_statuses(
            inputs.extract(ExtractKind::CustomerStatus)?,
        )?),
        Intent::HighValueInactive => customers::high_value_inactive(
            &records::decode_customer_summaries(inputs.extract(ExtractKind::CustomerSummary)?)?,
            &records::decode_customer_statuses(inputs.extract(ExtractKind::CustomerStatus)?)?,
        ),
        Intent::ChurnRisk => customers::churn_risk(records::decode_purchase_frequency(
            inputs.extract(ExtractKind::PurchaseFrequency)?,
        )?),
    };

    debug!(intent = intent.id(), rows = output.table.len(), "Report computed");
    Ok(output.with_sources(inputs.source_names()))
}

fn help() -> ReportOutput {
    ReportOutput::new(Intent::Help, ReportTable::Empty)
        .with_note("Answers sales BI questions from the CSV files exported from the warehouse views.")
        .with_note("Pick an option from the menu, or type a question.")
        .with_note("Example questions: \"top 5 vendedores\", \"forma de pagamento que mais fatura\", \"mês com maior faturamento\", \"clientes inativos\".")
}
