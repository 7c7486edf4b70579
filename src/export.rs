//! Spreadsheet export of projections
//!
//! Writes two CSV sheets, `Weekly_Projections.csv` and `Monthly_Summary.csv`.
//! Currency columns are rounded to 2 decimals and order counts to 1.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::models::{MonthlySummary, ProjectionRow};
use crate::projection::Projection;

pub const WEEKLY_SHEET: &str = "Weekly_Projections";
pub const MONTHLY_SHEET: &str = "Monthly_Summary";

#[derive(Debug, Serialize)]
struct WeeklyRecord {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Week")]
    week: u32,
    #[serde(rename = "Orders")]
    orders: f64,
    #[serde(rename = "Revenue")]
    revenue: f64,
    #[serde(rename = "Variable Costs")]
    variable_costs: f64,
    #[serde(rename = "Fixed Costs (Weekly)")]
    fixed_costs: f64,
    #[serde(rename = "Profit")]
    profit: f64,
    #[serde(rename = "Cumulative Profit")]
    cumulative_profit: f64,
}

impl From<&ProjectionRow> for WeeklyRecord {
    fn from(row: &ProjectionRow) -> Self {
        Self {
            month: row.month,
            week: row.global_week,
            orders: round_to(row.orders_this_week, 1),
            revenue: round_to(row.revenue, 2),
            variable_costs: round_to(row.variable_costs, 2),
            fixed_costs: round_to(row.fixed_costs_weekly, 2),
            profit: round_to(row.profit, 2),
            cumulative_profit: round_to(row.cumulative_profit, 2),
        }
    }
}

#[derive(Debug, Serialize)]
struct MonthlyRecord {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Orders")]
    orders: f64,
    #[serde(rename = "Revenue")]
    revenue: f64,
    #[serde(rename = "Variable Costs")]
    variable_costs: f64,
    #[serde(rename = "Fixed Costs")]
    fixed_costs: f64,
    #[serde(rename = "Profit")]
    profit: f64,
    #[serde(rename = "Cumulative Profit")]
    ending_cumulative_profit: f64,
}

impl From<&MonthlySummary> for MonthlyRecord {
    fn from(m: &MonthlySummary) -> Self {
        Self {
            month: m.month,
            orders: round_to(m.orders, 1),
            revenue: round_to(m.revenue, 2),
            variable_costs: round_to(m.variable_costs, 2),
            fixed_costs: round_to(m.fixed_costs, 2),
            profit: round_to(m.profit, 2),
            ending_cumulative_profit: round_to(m.ending_cumulative_profit, 2),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Write weekly rows as CSV.
pub fn write_weekly<W: Write>(writer: W, rows: &[ProjectionRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(WeeklyRecord::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write monthly summaries as CSV.
pub fn write_monthly<W: Write>(writer: W, months: &[MonthlySummary]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for month in months {
        csv_writer.serialize(MonthlyRecord::from(month))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write both sheets of a projection into `dir`, creating it if needed.
///
/// Returns the paths of the weekly and monthly files.
pub fn export_projection(dir: &Path, projection: &Projection) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let weekly_path = dir.join(format!("{WEEKLY_SHEET}.csv"));
    let weekly_file = fs::File::create(&weekly_path)
        .with_context(|| format!("Failed to create {}", weekly_path.display()))?;
    write_weekly(weekly_file, &projection.rows)?;

    let monthly_path = dir.join(format!("{MONTHLY_SHEET}.csv"));
    let monthly_file = fs::File::create(&monthly_path)
        .with_context(|| format!("Failed to create {}", monthly_path.display()))?;
    write_monthly(monthly_file, &projection.monthly_summary())?;

    info!(
        weeks = projection.rows.len(),
        dir = %dir.display(),
        "exported projection"
    );
    Ok((weekly_path, monthly_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostModel, ProjectionInputs};
    use crate::projection::project;

    fn sample_projection() -> Projection {
        project(&ProjectionInputs {
            costs: CostModel::new(12000.0, 450.0, 390.0).unwrap(),
            start_orders_monthly: 210.0,
            months: 2,
            growth_rate_percent: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn weekly_csv_is_rounded() {
        let mut buf = Vec::new();
        write_weekly(&mut buf, &sample_projection().rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Month,Week,Orders,Revenue,Variable Costs,Fixed Costs (Weekly),Profit,Cumulative Profit"
        );
        // 52.5 orders/week; fixed 12000 * 12 / 52 = 2769.2307...
        assert_eq!(
            lines.next().unwrap(),
            "1,1,52.5,23625.0,20475.0,2769.23,380.77,380.77"
        );
        assert_eq!(text.lines().count(), 9);
    }

    #[test]
    fn monthly_csv_has_one_row_per_month() {
        let mut buf = Vec::new();
        write_monthly(&mut buf, &sample_projection().monthly_summary()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Month,Orders,Revenue"));
        assert!(lines[1].starts_with("1,210.0,94500.0,81900.0,11076.92,"));
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn export_writes_both_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let (weekly, monthly) = export_projection(&dir.path().join("out"), &sample_projection()).unwrap();
        assert!(weekly.ends_with("Weekly_Projections.csv"));
        assert!(monthly.ends_with("Monthly_Summary.csv"));
        assert_eq!(fs::read_to_string(weekly).unwrap().lines().count(), 9);
        assert_eq!(fs::read_to_string(monthly).unwrap().lines().count(), 3);
    }
}
