//! Weekly and monthly financial projections
//!
//! Each projected month is simulated as exactly four weeks. Order volume
//! compounds once per month by the growth rate, and monthly fixed costs are
//! smoothed over the average 52/12 weeks per month.

use tracing::debug;

use crate::error::{CalcError, CalcResult};
use crate::models::{
    BreakevenResult, BreakevenWeek, CostModel, MonthlySummary, OrderCount, ProjectionInputs, ProjectionRow,
    SIMULATED_WEEKS_PER_MONTH, WEEKS_PER_MONTH_AVG,
};

/// Longest horizon accepted, in months.
pub const MAX_PROJECTION_MONTHS: u32 = 600;

impl ProjectionInputs {
    /// Build projection inputs from possibly-missing values.
    pub fn from_inputs(
        costs: CostModel,
        start_orders_monthly: Option<f64>,
        months: Option<u32>,
        growth_rate_percent: Option<f64>,
    ) -> CalcResult<Self> {
        let missing = |name: &str| CalcError::InvalidProjectionInput(format!("{name} is missing"));
        let inputs = Self {
            costs,
            start_orders_monthly: start_orders_monthly.ok_or_else(|| missing("starting order volume"))?,
            months: months.ok_or_else(|| missing("number of months"))?,
            growth_rate_percent: growth_rate_percent.ok_or_else(|| missing("growth rate"))?,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> CalcResult<()> {
        CostModel::new(
            self.costs.fixed_costs_monthly,
            self.costs.price_per_order,
            self.costs.variable_cost_per_order,
        )
        .map_err(|e| match e {
            CalcError::InvalidInput(reason) => CalcError::InvalidProjectionInput(reason),
            other => other,
        })?;

        if !self.start_orders_monthly.is_finite() || self.start_orders_monthly < 0.0 {
            return Err(CalcError::InvalidProjectionInput(format!(
                "starting order volume must be a non-negative number (got {})",
                self.start_orders_monthly
            )));
        }
        if self.months == 0 || self.months > MAX_PROJECTION_MONTHS {
            return Err(CalcError::InvalidProjectionInput(format!(
                "number of months must be within 1..={MAX_PROJECTION_MONTHS} (got {})",
                self.months
            )));
        }
        if !self.growth_rate_percent.is_finite() || self.growth_rate_percent < -100.0 {
            return Err(CalcError::InvalidProjectionInput(format!(
                "growth rate must be a number of at least -100% (got {})",
                self.growth_rate_percent
            )));
        }
        Ok(())
    }
}

/// One-pass generator of projection rows.
#[derive(Debug)]
pub struct ProjectionIter {
    inputs: ProjectionInputs,
    fixed_costs_weekly: f64,
    monthly_orders: f64,
    month: u32,
    weeks_done_in_month: u32,
    global_week: u32,
    cumulative_profit: f64,
}

impl ProjectionIter {
    pub fn new(inputs: ProjectionInputs) -> CalcResult<Self> {
        inputs.validate()?;
        Ok(Self {
            inputs,
            fixed_costs_weekly: inputs.costs.fixed_costs_monthly / WEEKS_PER_MONTH_AVG,
            monthly_orders: inputs.start_orders_monthly,
            month: 1,
            weeks_done_in_month: 0,
            global_week: 0,
            cumulative_profit: 0.0,
        })
    }

    fn remaining(&self) -> usize {
        let total = self.inputs.months * SIMULATED_WEEKS_PER_MONTH;
        (total - self.global_week) as usize
    }
}

impl Iterator for ProjectionIter {
    type Item = ProjectionRow;

    fn next(&mut self) -> Option<ProjectionRow> {
        if self.weeks_done_in_month == SIMULATED_WEEKS_PER_MONTH {
            if self.month >= self.inputs.months {
                return None;
            }
            self.month += 1;
            self.weeks_done_in_month = 0;
            self.monthly_orders *= 1.0 + self.inputs.growth_rate_percent / 100.0;
        }

        let costs = &self.inputs.costs;
        let orders_this_week = self.monthly_orders / f64::from(SIMULATED_WEEKS_PER_MONTH);
        let revenue = orders_this_week * costs.price_per_order;
        let variable_costs = orders_this_week * costs.variable_cost_per_order;
        let profit = revenue - variable_costs - self.fixed_costs_weekly;
        self.cumulative_profit += profit;

        self.weeks_done_in_month += 1;
        self.global_week += 1;

        Some(ProjectionRow {
            month: self.month,
            global_week: self.global_week,
            orders_this_week,
            revenue,
            variable_costs,
            fixed_costs_weekly: self.fixed_costs_weekly,
            profit,
            cumulative_profit: self.cumulative_profit,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ProjectionIter {}

impl std::iter::FusedIterator for ProjectionIter {}

/// A complete projection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub inputs: ProjectionInputs,
    pub rows: Vec<ProjectionRow>,
}

/// Horizon-wide totals of a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionTotals {
    pub orders: f64,
    pub revenue: f64,
    pub variable_costs: f64,
    pub fixed_costs: f64,
    pub profit: f64,
    pub ending_cumulative_profit: f64,
}

/// Starting monthly volume for a projection.
///
/// An explicit volume wins, then the target-profit volume, then the breakeven
/// volume. A seed with no finite order count is rejected.
pub fn seed_volume(
    breakeven: &BreakevenResult,
    target: Option<(f64, OrderCount)>,
    start_orders: Option<f64>,
) -> CalcResult<f64> {
    if let Some(orders) = start_orders {
        return Ok(orders);
    }

    let (source, orders) = match target {
        Some((target_profit, orders)) => (format!("target profit {target_profit}"), orders),
        None => ("breakeven".to_string(), breakeven.orders_needed),
    };
    let seed = orders.finite().ok_or_else(|| {
        CalcError::InvalidProjectionInput(format!(
            "cannot start from {source}: orders needed is {orders}"
        ))
    })?;

    debug!(%source, seed, "seeded projection volume");
    Ok(seed as f64)
}

/// Run the projection. Invalid inputs produce an error and no rows.
pub fn project(inputs: &ProjectionInputs) -> CalcResult<Projection> {
    let rows: Vec<ProjectionRow> = ProjectionIter::new(*inputs)?.collect();
    debug!(
        months = inputs.months,
        weeks = rows.len(),
        growth = inputs.growth_rate_percent,
        "generated projection"
    );
    Ok(Projection {
        inputs: *inputs,
        rows,
    })
}

impl Projection {
    pub fn breakeven_week(&self) -> BreakevenWeek {
        find_breakeven_week(&self.rows)
    }

    pub fn monthly_summary(&self) -> Vec<MonthlySummary> {
        summarize_by_month(&self.rows)
    }

    pub fn totals(&self) -> ProjectionTotals {
        let mut totals = ProjectionTotals {
            orders: 0.0,
            revenue: 0.0,
            variable_costs: 0.0,
            fixed_costs: 0.0,
            profit: 0.0,
            ending_cumulative_profit: 0.0,
        };
        for row in &self.rows {
            totals.orders += row.orders_this_week;
            totals.revenue += row.revenue;
            totals.variable_costs += row.variable_costs;
            totals.fixed_costs += row.fixed_costs_weekly;
            totals.profit += row.profit;
            totals.ending_cumulative_profit = row.cumulative_profit;
        }
        totals
    }
}

/// First row, in week order, whose cumulative profit is non-negative.
pub fn find_breakeven_week(rows: &[ProjectionRow]) -> BreakevenWeek {
    rows.iter()
        .find(|row| row.cumulative_profit >= 0.0)
        .map_or(BreakevenWeek::NotReached, |row| BreakevenWeek::Reached {
            week: row.global_week,
            month: row.month,
        })
}

/// Aggregate weekly rows into one summary per month.
///
/// Rows must be in week order, as produced by `ProjectionIter`.
pub fn summarize_by_month(rows: &[ProjectionRow]) -> Vec<MonthlySummary> {
    let mut summaries: Vec<MonthlySummary> = Vec::new();

    for row in rows {
        match summaries.last_mut() {
            Some(summary) if summary.month == row.month => {
                summary.orders += row.orders_this_week;
                summary.revenue += row.revenue;
                summary.variable_costs += row.variable_costs;
                summary.fixed_costs += row.fixed_costs_weekly;
                summary.profit += row.profit;
                summary.ending_cumulative_profit = row.cumulative_profit;
            }
            _ => summaries.push(MonthlySummary {
                month: row.month,
                orders: row.orders_this_week,
                revenue: row.revenue,
                variable_costs: row.variable_costs,
                fixed_costs: row.fixed_costs_weekly,
                profit: row.profit,
                ending_cumulative_profit: row.cumulative_profit,
            }),
        }
    }

    summaries
}
