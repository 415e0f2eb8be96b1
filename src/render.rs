//! Presentation - text tables, text charts and JSON for report outputs

use crate::error::Result;
use crate::records::CustomerStatus;
use crate::report::{Chart, ChartKind, MetricValue, ReportOutput, ReportTable};
use chrono::NaiveDate;
use polars::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

const CHART_WIDTH: usize = 40;

/// Brazilian currency: `R$ 1.234,56`.
pub fn fmt_money(value: Decimal) -> String {
    let rounded = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("R$ {}{},{}", sign, group_thousands(int_part), frac_part)
}

/// Integer with `.` thousands separators.
pub fn fmt_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn money(value: Option<Decimal>) -> String {
    value.map(fmt_money).unwrap_or_default()
}

fn count(value: Option<i64>) -> String {
    value.map(fmt_count).unwrap_or_default()
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn status(value: &Option<CustomerStatus>) -> String {
    value.as_ref().map(|s| s.label()).unwrap_or_default()
}

fn frame(columns: Vec<(&str, Vec<String>)>) -> Result<DataFrame> {
    let series: Vec<Series> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name, values))
        .collect();
    Ok(DataFrame::new(series)?)
}

/// The result table as a frame of display strings; `None` for reports
/// without a table.
pub fn table_frame(table: &ReportTable) -> Result<Option<DataFrame>> {
    let df = match table {
        ReportTable::Empty => return Ok(None),
        ReportTable::Sales(rows) => frame(vec![
            ("valor", rows.iter().map(|r| money(r.amount)).collect()),
            ("numero_nf", rows.iter().map(|r| text(&r.invoice_number)).collect()),
            ("data_venda", rows.iter().map(|r| date(r.sale_date)).collect()),
            ("forma_pagamento", rows.iter().map(|r| text(&r.payment_method)).collect()),
            ("nome_vendedor", rows.iter().map(|r| text(&r.salesperson)).collect()),
            ("id_cliente", rows.iter().map(|r| text(&r.customer_id)).collect()),
        ])?,
        ReportTable::Extremes(rows) => frame(vec![
            (
                "venda",
                rows.iter()
                    .map(|r| match r.kind {
                        crate::report::ExtremeKind::Largest => "maior".to_string(),
                        crate::report::ExtremeKind::Smallest => "menor".to_string(),
                    })
                    .collect(),
            ),
            ("valor", rows.iter().map(|r| fmt_money(r.amount)).collect()),
            ("nota_fiscal", rows.iter().map(|r| text(&r.invoice_number)).collect()),
            ("data", rows.iter().map(|r| date(r.sale_date)).collect()),
        ])?,
        ReportTable::Months(rows) => frame(vec![
            ("periodo", rows.iter().map(|r| r.period.clone()).collect()),
            ("mes_extenso", rows.iter().map(|r| text(&r.month_name)).collect()),
            ("faturamento", rows.iter().map(|r| money(r.revenue)).collect()),
            ("ticket_medio", rows.iter().map(|r| money(r.average_ticket)).collect()),
        ])?,
        ReportTable::Days(rows) => frame(vec![
            ("data", rows.iter().map(|r| date(r.date)).collect()),
            ("faturamento", rows.iter().map(|r| money(r.revenue)).collect()),
            ("qtd_vendas", rows.iter().map(|r| count(r.sale_count)).collect()),
            ("ticket_medio", rows.iter().map(|r| money(r.average_ticket)).collect()),
        ])?,
        ReportTable::Groups { dimension, rows } => frame(vec![
            (dimension.as_str(), rows.iter().map(|r| r.key.clone()).collect()),
            ("faturamento", rows.iter().map(|r| fmt_money(r.revenue)).collect()),
            ("qtd_vendas", rows.iter().map(|r| fmt_count(r.sale_count as i64)).collect()),
        ])?,
        ReportTable::SellerCustomers(rows) => frame(vec![
            ("nome_vendedor", rows.iter().map(|r| r.salesperson.clone()).collect()),
            ("clientes_distintos", rows.iter().map(|r| fmt_count(r.distinct_customers as i64)).collect()),
            ("qtd_vendas", rows.iter().map(|r| fmt_count(r.sale_count as i64)).collect()),
            ("faturamento", rows.iter().map(|r| fmt_money(r.revenue)).collect()),
        ])?,
        ReportTable::SellerMix(rows) => frame(vec![
            ("nome_vendedor", rows.iter().map(|r| text(&r.salesperson)).collect()),
            (
                "tipo_pessoa",
                rows.iter()
                    .map(|r| r.customer_type.as_ref().map(|t| t.code().to_string()).unwrap_or_default())
                    .collect(),
            ),
            ("qtd_vendas", rows.iter().map(|r| count(r.sale_count)).collect()),
            ("faturamento", rows.iter().map(|r| money(r.revenue)).collect()),
            (
                "participacao_pct",
                rows.iter()
                    .map(|r| r.share_percent.map(|p| format!("{:.2}%", p.round_dp(2))).unwrap_or_default())
                    .collect(),
            ),
        ])?,
        ReportTable::Customers(rows) => frame(vec![
            ("id_cliente", rows.iter().map(|r| text(&r.customer_id)).collect()),
            ("nome_cliente", rows.iter().map(|r| text(&r.customer_name)).collect()),
            ("total_comprado", rows.iter().map(|r| money(r.total_purchased)).collect()),
            ("qtd_compras", rows.iter().map(|r| count(r.purchase_count)).collect()),
            ("ultima_compra", rows.iter().map(|r| date(r.last_purchase)).collect()),
        ])?,
        ReportTable::Statuses(rows) => frame(vec![
            ("id_cliente", rows.iter().map(|r| text(&r.customer_id)).collect()),
            ("nome_cliente", rows.iter().map(|r| text(&r.customer_name)).collect()),
            ("data_ultima_compra", rows.iter().map(|r| date(r.last_purchase)).collect()),
            ("status_cliente", rows.iter().map(|r| status(&r.status)).collect()),
        ])?,
        ReportTable::StatusCounts(rows) => frame(vec![
            ("status_cliente", rows.iter().map(|r| r.status.clone()).collect()),
            ("qtd_clientes", rows.iter().map(|r| fmt_count(r.customers as i64)).collect()),
        ])?,
        ReportTable::Reactivation(rows) => frame(vec![
            ("id_cliente", rows.iter().map(|r| text(&r.customer_id)).collect()),
            ("nome_cliente", rows.iter().map(|r| text(&r.customer_name)).collect()),
            ("total_comprado", rows.iter().map(|r| money(r.total_purchased)).collect()),
            ("qtd_compras", rows.iter().map(|r| count(r.purchase_count)).collect()),
            ("ultima_compra", rows.iter().map(|r| date(r.last_purchase)).collect()),
            ("status_cliente", rows.iter().map(|r| status(&r.status)).collect()),
        ])?,
        ReportTable::Frequency(rows) => frame(vec![
            ("id_cliente", rows.iter().map(|r| text(&r.customer_id)).collect()),
            ("nome_cliente", rows.iter().map(|r| text(&r.customer_name)).collect()),
            ("qtd_compras", rows.iter().map(|r| count(r.purchase_count)).collect()),
            ("faturamento_total", rows.iter().map(|r| money(r.total_revenue)).collect()),
            (
                "dias_medios_entre_compras",
                rows.iter()
                    .map(|r| r.average_days_between.map(|d| d.round_dp(1).to_string()).unwrap_or_default())
                    .collect(),
            ),
        ])?,
    };
    Ok(Some(df))
}

/// Horizontal text bars, one per point, scaled to the largest value.
pub fn render_chart(chart: &Chart) -> String {
    let max = chart
        .points
        .iter()
        .map(|p| p.value)
        .max()
        .unwrap_or(Decimal::ZERO);
    let label_width = chart.points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);
    let kind = match chart.kind {
        ChartKind::Line => "line",
        ChartKind::Bar => "bar",
    };

    let mut out = format!("[{} chart: {}]\n", kind, chart.series);
    for point in &chart.points {
        let width = if max > Decimal::ZERO && point.value > Decimal::ZERO {
            let scaled = point.value * Decimal::from(CHART_WIDTH) / max;
            scaled.round().to_usize().unwrap_or(0)
        } else {
            0
        };
        out.push_str(&format!(
            "{:<label_width$} | {} {}\n",
            point.label,
            "#".repeat(width),
            point.value.round_dp(2),
            label_width = label_width
        ));
    }
    out
}

pub fn render_text(output: &ReportOutput) -> Result<String> {
    let mut out = format!("== {} ==\n", output.title);

    for metric in &output.metrics {
        let value = match &metric.value {
            MetricValue::Money(v) => fmt_money(*v),
            MetricValue::Count(v) => fmt_count(*v as i64),
        };
        out.push_str(&format!("{}: {}\n", metric.label, value));
    }

    for note in &output.notes {
        out.push_str(note);
        out.push('\n');
    }

    if let Some(df) = table_frame(&output.table)? {
        out.push_str(&format!("{}\n", df));
    }

    if let Some(chart) = &output.chart {
        out.push_str(&render_chart(chart));
    }

    if !output.sources.is_empty() {
        out.push_str(&format!("Source: {}\n", output.sources.join(", ")));
    }
    Ok(out)
}

pub fn render_json(output: &ReportOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

pub fn render(output: &ReportOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => render_text(output),
        OutputFormat::Json => render_json(output),
    }
}
