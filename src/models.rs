//! Data models for costs, breakeven results and projections

use crate::error::{CalcError, CalcResult, require};

/// Average weeks in a month (52/12), used to smooth fixed costs per week.
pub const WEEKS_PER_MONTH_AVG: f64 = 52.0 / 12.0;

/// Weeks simulated per projected month.
///
/// Deliberately not `WEEKS_PER_MONTH_AVG`: fixed costs are amortized over
/// 52/12 weeks while each month is simulated as exactly 4 weeks.
pub const SIMULATED_WEEKS_PER_MONTH: u32 = 4;

/// Per-order economics of the business plus its monthly fixed costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub fixed_costs_monthly: f64,
    pub price_per_order: f64,
    pub variable_cost_per_order: f64,
}

impl CostModel {
    /// Build a validated cost model.
    ///
    /// Fails when price is not positive or either cost is negative.
    pub fn new(fixed_costs_monthly: f64, price_per_order: f64, variable_cost_per_order: f64) -> CalcResult<Self> {
        Self::from_inputs(
            Some(fixed_costs_monthly),
            Some(price_per_order),
            Some(variable_cost_per_order),
        )
    }

    /// Build a cost model from possibly-missing inputs.
    pub fn from_inputs(
        fixed_costs_monthly: Option<f64>,
        price_per_order: Option<f64>,
        variable_cost_per_order: Option<f64>,
    ) -> CalcResult<Self> {
        let fixed = require(fixed_costs_monthly, "fixed costs")?;
        let price = require(price_per_order, "price per order")?;
        let variable = require(variable_cost_per_order, "variable cost per order")?;

        if price <= 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "price per order must be positive (got {price})"
            )));
        }
        if variable < 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "variable cost per order cannot be negative (got {variable})"
            )));
        }
        if fixed < 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "fixed costs cannot be negative (got {fixed})"
            )));
        }

        Ok(Self {
            fixed_costs_monthly: fixed,
            price_per_order: price,
            variable_cost_per_order: variable,
        })
    }

    /// Build a cost model whose variable cost is a percentage of the price.
    pub fn with_variable_percent(fixed_costs_monthly: f64, price_per_order: f64, variable_percent: f64) -> CalcResult<Self> {
        if !variable_percent.is_finite() || variable_percent < 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "variable cost percentage must be a non-negative number (got {variable_percent})"
            )));
        }
        Self::new(
            fixed_costs_monthly,
            price_per_order,
            price_per_order * variable_percent / 100.0,
        )
    }

    /// Revenue per order minus variable cost per order.
    pub fn contribution_margin(&self) -> f64 {
        self.price_per_order - self.variable_cost_per_order
    }

    /// Contribution margin as a percentage of the price.
    pub fn contribution_margin_percent(&self) -> f64 {
        self.contribution_margin() / self.price_per_order * 100.0
    }

    /// A model is viable only when each order covers its own variable cost.
    pub fn is_viable(&self) -> bool {
        self.variable_cost_per_order < self.price_per_order
    }
}

/// Monthly fixed costs made of a lump sum plus a per-day component
/// (e.g. ad spend plus daily wages).
pub fn monthly_fixed_costs(lump_sum: f64, daily: f64, days_per_month: u32) -> f64 {
    lump_sum + daily * f64::from(days_per_month)
}

/// An order volume that may have no finite answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCount {
    Finite(u64),
    /// Inputs are valid but no finite volume reaches the goal.
    Unreachable,
    /// Inputs are valid but the question has no meaningful answer.
    Undefined,
}

impl OrderCount {
    pub fn finite(&self) -> Option<u64> {
        match self {
            OrderCount::Finite(n) => Some(*n),
            _ => None,
        }
    }

    /// Revenue earned by this many orders, when the count is finite.
    pub fn revenue_at(&self, price_per_order: f64) -> Option<f64> {
        self.finite().map(|n| n as f64 * price_per_order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakevenResult {
    pub orders_needed: OrderCount,
    pub contribution_margin: f64,
    pub price_per_order: f64,
}

impl BreakevenResult {
    pub fn revenue_needed(&self) -> Option<f64> {
        self.orders_needed.revenue_at(self.price_per_order)
    }
}

/// One add-on sold alongside a dress (e.g. a personalized scarf).
#[derive(Debug, Clone, PartialEq)]
pub struct Addon {
    pub name: String,
    pub price: f64,
    pub cost: f64,
}

impl Addon {
    pub fn new(name: impl Into<String>, price: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            price,
            cost,
        }
    }

    pub fn profit(&self) -> f64 {
        self.price - self.cost
    }
}

/// Lifecycle economics of one dress: rented a few times, then resold.
#[derive(Debug, Clone, PartialEq)]
pub struct DressEconomics {
    pub purchase_cost: f64,
    pub resale_price: f64,
    pub avg_rental_price: f64,
    pub avg_rentals_per_dress: f64,
    pub addons: Vec<Addon>,
    /// Share of sales that include the full add-on set, 0..=100.
    pub personalized_percent: f64,
}

/// Inputs to the projection engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInputs {
    pub costs: CostModel,
    pub start_orders_monthly: f64,
    pub months: u32,
    /// Monthly growth in percent; negative values model decline.
    pub growth_rate_percent: f64,
}

/// One simulated week of the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRow {
    pub month: u32,
    pub global_week: u32,
    pub orders_this_week: f64,
    pub revenue: f64,
    pub variable_costs: f64,
    pub fixed_costs_weekly: f64,
    pub profit: f64,
    pub cumulative_profit: f64,
}

/// Projection rows aggregated per month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: u32,
    pub orders: f64,
    pub revenue: f64,
    pub variable_costs: f64,
    pub fixed_costs: f64,
    pub profit: f64,
    pub ending_cumulative_profit: f64,
}

/// First week where cumulative profit is no longer negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakevenWeek {
    Reached { week: u32, month: u32 },
    NotReached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_model_rejects_bad_inputs() {
        assert!(CostModel::new(100.0, 0.0, 10.0).is_err());
        assert!(CostModel::new(100.0, -5.0, 10.0).is_err());
        assert!(CostModel::new(100.0, 50.0, -1.0).is_err());
        assert!(CostModel::new(-1.0, 50.0, 10.0).is_err());
        assert!(CostModel::from_inputs(None, Some(50.0), Some(10.0)).is_err());
        assert!(CostModel::new(0.0, 50.0, 0.0).is_ok());
    }

    #[test]
    fn variable_cost_from_percentage() {
        let model = CostModel::with_variable_percent(1000.0, 450.0, 20.0).unwrap();
        assert!((model.variable_cost_per_order - 90.0).abs() < 1e-9);
        assert!((model.contribution_margin() - 360.0).abs() < 1e-9);
        assert!((model.contribution_margin_percent() - 80.0).abs() < 1e-9);
        assert!(CostModel::with_variable_percent(1000.0, 450.0, -5.0).is_err());
    }

    #[test]
    fn viability_requires_positive_margin() {
        assert!(CostModel::new(0.0, 450.0, 390.0).unwrap().is_viable());
        assert!(!CostModel::new(0.0, 450.0, 450.0).unwrap().is_viable());
        assert!(!CostModel::new(0.0, 450.0, 500.0).unwrap().is_viable());
    }

    #[test]
    fn fixed_costs_from_parts() {
        assert_eq!(monthly_fixed_costs(3000.0, 300.0, 30), 12000.0);
    }

    #[test]
    fn order_count_revenue_only_when_finite() {
        assert_eq!(OrderCount::Finite(200).revenue_at(450.0), Some(90000.0));
        assert_eq!(OrderCount::Unreachable.revenue_at(450.0), None);
        assert_eq!(OrderCount::Undefined.finite(), None);
    }
}
