//! Typed records decoded from validated extracts
//!
//! Cells are coerced, never rejected: an unparsable number or date becomes
//! `None`, the way the views' consumers have always treated dirty cells.

use crate::error::Result;
use crate::extract::Extract;
use crate::schema::columns;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let currency = raw.starts_with("R$");
    let s = raw.trim_start_matches("R$").trim();
    if s.is_empty() {
        return None;
    }

    // pt-BR thousands without a decimal part: "1.234.567", "R$ 1.500".
    if !s.contains(',') && is_dot_grouped(s) && (currency || s.matches('.').count() > 1) {
        return Decimal::from_str(&s.replace('.', "")).ok();
    }

    if let Ok(value) = Decimal::from_str(s) {
        return Some(value);
    }
    if let Ok(value) = Decimal::from_scientific(s) {
        return Some(value);
    }

    // Grouped forms: the right-most of ',' / '.' is the decimal mark.
    let normalized = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) => s.replace(',', "."),
        _ => return None,
    };
    Decimal::from_str(&normalized).ok()
}

/// `1.234.567`: a leading group of 1-3 digits, then groups of exactly three.
fn is_dot_grouped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut groups = digits.split('.');
    let leading_ok = groups
        .next()
        .map(|g| (1..=3).contains(&g.len()) && g.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    let mut rest = groups.peekable();
    leading_ok
        && rest.peek().is_some()
        && rest.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    parse_decimal(s)
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_i64())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    // Timestamps keep their calendar day.
    if s.len() >= 10 && s.is_char_boundary(10) {
        if let Ok(date) = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

/// Title-case like the warehouse reports do: a letter is upper-cased when
/// it follows a non-letter, lower-cased otherwise. "em_ANALISE" -> "Em_Analise".
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut after_letter = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Other(String),
}

impl CustomerStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "ativo" => CustomerStatus::Active,
            "inativo" => CustomerStatus::Inactive,
            _ => CustomerStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn is_inactive(&self) -> bool {
        matches!(self, CustomerStatus::Inactive)
    }

    pub fn label(&self) -> String {
        match self {
            CustomerStatus::Active => "Ativo".to_string(),
            CustomerStatus::Inactive => "Inativo".to_string(),
            CustomerStatus::Other(raw) => title_case(raw),
        }
    }
}

/// `tipo_pessoa`: PF (individual) or PJ (business).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Individual,
    Business,
    Other(String),
}

impl CustomerType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PF" => CustomerType::Individual,
            "PJ" => CustomerType::Business,
            _ => CustomerType::Other(raw.trim().to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            CustomerType::Individual => "PF",
            CustomerType::Business => "PJ",
            CustomerType::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub amount: Option<Decimal>,
    pub invoice_number: Option<String>,
    pub sale_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub salesperson: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub month_name: Option<String>,
    pub revenue: Option<Decimal>,
    pub average_ticket: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: Option<NaiveDate>,
    pub revenue: Option<Decimal>,
    pub sale_count: Option<i64>,
    pub average_ticket: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub total_purchased: Option<Decimal>,
    pub purchase_count: Option<i64>,
    pub last_purchase: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStatusRecord {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub last_purchase: Option<NaiveDate>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerMixRecord {
    pub salesperson: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub sale_count: Option<i64>,
    pub revenue: Option<Decimal>,
    pub share_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseFrequency {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub purchase_count: Option<i64>,
    pub total_revenue: Option<Decimal>,
    pub average_days_between: Option<Decimal>,
}

/// Cells of `name`, or all-null when the extract lacks the column.
fn cells(extract: &Extract, name: &str) -> Result<Vec<Option<String>>> {
    Ok(extract
        .optional_text_column(name)?
        .unwrap_or_else(|| vec![None; extract.height()]))
}

fn decoded<T>(extract: &Extract, name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Vec<Option<T>>> {
    Ok(cells(extract, name)?
        .into_iter()
        .map(|cell| cell.as_deref().and_then(&parse))
        .collect())
}

fn texts(extract: &Extract, name: &str) -> Result<Vec<Option<String>>> {
    cells(extract, name)
}

pub fn decode_sales(extract: &Extract, value_column: &str) -> Result<Vec<SaleRecord>> {
    let amounts = decoded(extract, value_column, parse_decimal)?;
    let invoices = texts(extract, columns::INVOICE_NUMBER)?;
    let dates = decoded(extract, columns::SALE_DATE, parse_date)?;
    let methods = texts(extract, columns::PAYMENT_METHOD)?;
    let sellers = texts(extract, columns::SALESPERSON)?;
    let customers = texts(extract, columns::CUSTOMER_ID)?;

    Ok(amounts
        .into_iter()
        .zip(invoices)
        .zip(dates)
        .zip(methods)
        .zip(sellers)
        .zip(customers)
        .map(
            |(((((amount, invoice_number), sale_date), payment_method), salesperson), customer_id)| {
                SaleRecord {
                    amount,
                    invoice_number,
                    sale_date,
                    payment_method,
                    salesperson,
                    customer_id,
                }
            },
        )
        .collect())
}

pub fn decode_monthly(extract: &Extract) -> Result<Vec<MonthlyAggregate>> {
    let years = decoded(extract, columns::YEAR, parse_integer)?;
    let months = decoded(extract, columns::MONTH, parse_integer)?;
    let names = texts(extract, columns::MONTH_NAME)?;
    let revenues = decoded(extract, columns::REVENUE, parse_decimal)?;
    let tickets = decoded(extract, columns::AVERAGE_TICKET, parse_decimal)?;

    Ok(years
        .into_iter()
        .zip(months)
        .zip(names)
        .zip(revenues)
        .zip(tickets)
        .map(|((((year, month), month_name), revenue), average_ticket)| MonthlyAggregate {
            year,
            month,
            month_name,
            revenue,
            average_ticket,
        })
        .collect())
}

pub fn decode_daily(extract: &Extract) -> Result<Vec<DailyAggregate>> {
    let dates = decoded(extract, columns::DATE, parse_date)?;
    let revenues = decoded(extract, columns::REVENUE, parse_decimal)?;
    let counts = decoded(extract, columns::SALE_COUNT, parse_integer)?;
    let tickets = decoded(extract, columns::AVERAGE_TICKET, parse_decimal)?;

    Ok(dates
        .into_iter()
        .zip(revenues)
        .zip(counts)
        .zip(tickets)
        .map(|(((date, revenue), sale_count), average_ticket)| DailyAggregate {
            date,
            revenue,
            sale_count,
            average_ticket,
        })
        .collect())
}

pub fn decode_customer_summaries(extract: &Extract) -> Result<Vec<CustomerSummary>> {
    let ids = texts(extract, columns::CUSTOMER_ID)?;
    let names = texts(extract, columns::CUSTOMER_NAME)?;
    let totals = decoded(extract, columns::TOTAL_PURCHASED, parse_decimal)?;
    let counts = decoded(extract, columns::PURCHASE_COUNT, parse_integer)?;
    let last = decoded(extract, columns::LAST_PURCHASE, parse_date)?;

    Ok(ids
        .into_iter()
        .zip(names)
        .zip(totals)
        .zip(counts)
        .zip(last)
        .map(
            |((((customer_id, customer_name), total_purchased), purchase_count), last_purchase)| {
                CustomerSummary {
                    customer_id,
                    customer_name,
                    total_purchased,
                    purchase_count,
                    last_purchase,
                }
            },
        )
        .collect())
}

pub fn decode_customer_statuses(extract: &Extract) -> Result<Vec<CustomerStatusRecord>> {
    let ids = texts(extract, columns::CUSTOMER_ID)?;
    let names = texts(extract, columns::CUSTOMER_NAME)?;
    let last = decoded(extract, columns::STATUS_LAST_PURCHASE, parse_date)?;
    let statuses = decoded(extract, columns::CUSTOMER_STATUS, |raw| Some(CustomerStatus::parse(raw)))?;

    Ok(ids
        .into_iter()
        .zip(names)
        .zip(last)
        .zip(statuses)
        .map(|(((customer_id, customer_name), last_purchase), status)| CustomerStatusRecord {
            customer_id,
            customer_name,
            last_purchase,
            status,
        })
        .collect())
}

pub fn decode_seller_mix(extract: &Extract) -> Result<Vec<SellerMixRecord>> {
    let sellers = texts(extract, columns::SALESPERSON)?;
    let types = decoded(extract, columns::CUSTOMER_TYPE, |raw| Some(CustomerType::parse(raw)))?;
    let counts = decoded(extract, columns::SALE_COUNT, parse_integer)?;
    let revenues = decoded(extract, columns::REVENUE, parse_decimal)?;
    let shares = decoded(extract, columns::SHARE_PERCENT, parse_decimal)?;

    Ok(sellers
        .into_iter()
        .zip(types)
        .zip(counts)
        .zip(revenues)
        .zip(shares)
        .map(
            |((((salesperson, customer_type), sale_count), revenue), share_percent)| SellerMixRecord {
                salesperson,
                customer_type,
                sale_count,
                revenue,
                share_percent,
            },
        )
        .collect())
}

pub fn decode_purchase_frequency(extract: &Extract) -> Result<Vec<PurchaseFrequency>> {
    let ids = texts(extract, columns::CUSTOMER_ID)?;
    let names = texts(extract, columns::CUSTOMER_NAME)?;
    let counts = decoded(extract, columns::PURCHASE_COUNT, parse_integer)?;
    let totals = decoded(extract, columns::TOTAL_REVENUE, parse_decimal)?;
    let days = decoded(extract, columns::AVERAGE_DAYS_BETWEEN, parse_decimal)?;

    Ok(ids
        .into_iter()
        .zip(names)
        .zip(counts)
        .zip(totals)
        .zip(days)
        .map(
            |((((customer_id, customer_name), purchase_count), total_revenue), average_days_between)| {
                PurchaseFrequency {
                    customer_id,
                    customer_name,
                    purchase_count,
                    total_revenue,
                    average_days_between,
                }
            },
        )
        .collect())
}
