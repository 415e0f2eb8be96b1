//! Monthly and daily revenue reports

use super::operators::{sort_stable, top_n, SortOrder};
use crate::intent::Intent;
use crate::records::{DailyAggregate, MonthlyAggregate};
use crate::report::{Chart, ChartKind, ChartPoint, MonthRow, ReportOutput, ReportTable};
use crate::schema::columns;

pub const MONTH_RANKING_LIMIT: usize = 12;
pub const DAILY_TABLE_ROWS: usize = 60;

/// `YYYY-MM`, month zero-padded; unparsable parts render as `?`.
pub fn period_label(year: Option<i64>, month: Option<i64>) -> String {
    let year = year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string());
    let month = month.map(|m| format!("{:02}", m)).unwrap_or_else(|| "?".to_string());
    format!("{}-{}", year, month)
}

fn month_row(month: MonthlyAggregate) -> MonthRow {
    MonthRow {
        period: period_label(month.year, month.month),
        month_name: month.month_name,
        revenue: month.revenue,
        average_ticket: month.average_ticket,
    }
}

fn ranked_months(intent: Intent, months: Vec<MonthlyAggregate>, order: SortOrder) -> ReportOutput {
    let ranked = top_n(months, |m| m.revenue, order, MONTH_RANKING_LIMIT);
    ReportOutput::new(intent, ReportTable::Months(ranked.into_iter().map(month_row).collect()))
}

pub fn best_months(months: Vec<MonthlyAggregate>) -> ReportOutput {
    ranked_months(Intent::BestMonths, months, SortOrder::Descending)
}

pub fn worst_months(months: Vec<MonthlyAggregate>) -> ReportOutput {
    ranked_months(Intent::WorstMonths, months, SortOrder::Ascending)
}

/// Every month in calendar order, with a revenue line chart.
pub fn monthly_series(mut months: Vec<MonthlyAggregate>) -> ReportOutput {
    sort_stable(&mut months, |m| Some((m.year?, m.month?)), SortOrder::Ascending);
    let rows: Vec<MonthRow> = months.into_iter().map(month_row).collect();

    let points = rows
        .iter()
        .filter_map(|row| {
            row.revenue.map(|value| ChartPoint {
                label: row.period.clone(),
                value,
            })
        })
        .collect();

    ReportOutput::new(Intent::MonthlySeries, ReportTable::Months(rows)).with_chart(Chart {
        kind: ChartKind::Line,
        series: columns::REVENUE.to_string(),
        points,
    })
}

/// Days in date order. The table shows the first rows only; the chart
/// covers the whole series.
pub fn daily_series(mut days: Vec<DailyAggregate>) -> ReportOutput {
    sort_stable(&mut days, |d| d.date, SortOrder::Ascending);

    let points = days
        .iter()
        .filter_map(|day| match (day.date, day.revenue) {
            (Some(date), Some(value)) => Some(ChartPoint {
                label: date.to_string(),
                value,
            }),
            _ => None,
        })
        .collect();

    days.truncate(DAILY_TABLE_ROWS);
    ReportOutput::new(Intent::DailySeries, ReportTable::Days(days)).with_chart(Chart {
        kind: ChartKind::Line,
        series: columns::REVENUE.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn month(year: i64, month: i64, revenue: Decimal) -> MonthlyAggregate {
        MonthlyAggregate {
            year: Some(year),
            month: Some(month),
            month_name: Some(format!("m{month}")),
            revenue: Some(revenue),
            average_ticket: Some(dec!(1)),
        }
    }

    fn rows(output: &ReportOutput) -> &[MonthRow] {
        match &output.table {
            ReportTable::Months(rows) => rows,
            other => panic!("unexpected table: {other:?}"),
        }
    }

    fn year_of_months() -> Vec<MonthlyAggregate> {
        let revenues = [
            dec!(500), dec!(120), dec!(900), dec!(300), dec!(750), dec!(80),
            dec!(640), dec!(410), dec!(220), dec!(999), dec!(35), dec!(860),
        ];
        revenues
            .iter()
            .enumerate()
            .map(|(i, r)| month(2024, i as i64 + 1, *r))
            .collect()
    }

    #[test]
    fn test_period_label_pads_month() {
        assert_eq!(period_label(Some(2024), Some(3)), "2024-03");
        assert_eq!(period_label(Some(2024), Some(11)), "2024-11");
        assert_eq!(period_label(None, Some(1)), "?-01");
    }

    #[test]
    fn test_best_months_returns_all_twelve_descending() {
        let output = best_months(year_of_months());
        let rows = rows(&output);

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].period, "2024-10");
        assert_eq!(rows[11].period, "2024-11");
        assert!(rows.windows(2).all(|w| w[0].revenue >= w[1].revenue));
        assert!(rows.iter().all(|r| r.period.len() == 7 && r.period.starts_with("2024-")));
    }

    #[test]
    fn test_worst_months_ascending_and_capped() {
        let mut months = year_of_months();
        months.push(month(2023, 12, dec!(1)));
        let output = worst_months(months);
        let rows = rows(&output);

        assert_eq!(rows.len(), MONTH_RANKING_LIMIT);
        assert_eq!(rows[0].period, "2023-12");
        assert!(rows.windows(2).all(|w| w[0].revenue <= w[1].revenue));
    }

    #[test]
    fn test_monthly_series_calendar_order_with_chart() {
        let months = vec![
            month(2024, 2, dec!(20)),
            month(2023, 12, dec!(5)),
            month(2024, 1, dec!(10)),
        ];
        let output = monthly_series(months);
        let periods: Vec<&str> = rows(&output).iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, ["2023-12", "2024-01", "2024-02"]);

        let chart = output.chart.as_ref().unwrap();
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(
            chart.points.iter().map(|p| p.label.as_str()).collect::<Vec<_>>(),
            periods
        );
    }

    #[test]
    fn test_daily_series_truncates_table_not_chart() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut days: Vec<DailyAggregate> = (0..90)
            .rev()
            .map(|i| DailyAggregate {
                date: start.checked_add_days(chrono::Days::new(i)),
                revenue: Some(Decimal::from(i)),
                sale_count: Some(1),
                average_ticket: Some(Decimal::from(i)),
            })
            .collect();
        days.push(DailyAggregate {
            date: None,
            revenue: Some(dec!(1)),
            sale_count: Some(1),
            average_ticket: None,
        });

        let output = daily_series(days);
        match &output.table {
            ReportTable::Days(rows) => {
                assert_eq!(rows.len(), DAILY_TABLE_ROWS);
                assert_eq!(rows[0].date, Some(start));
                assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
            }
            other => panic!("unexpected table: {other:?}"),
        }
        assert_eq!(output.chart.unwrap().points.len(), 90);
    }
}
