//! Breakeven and target-profit order volumes

use tracing::{debug, warn};

use crate::error::{CalcError, CalcResult, require};
use crate::models::{BreakevenResult, CostModel, OrderCount};

/// Orders needed to bring profit to zero.
///
/// Missing, negative or non-positive-price inputs are an error. A zero
/// contribution margin yields `Unreachable`, a negative one `Undefined`.
pub fn compute_breakeven(
    fixed_costs: Option<f64>,
    price: Option<f64>,
    variable_cost: Option<f64>,
) -> CalcResult<BreakevenResult> {
    let model = CostModel::from_inputs(fixed_costs, price, variable_cost)?;
    Ok(breakeven_for(&model))
}

/// Breakeven for an already validated cost model.
pub fn breakeven_for(model: &CostModel) -> BreakevenResult {
    let margin = model.contribution_margin();
    let orders_needed = if margin > 0.0 {
        if model.fixed_costs_monthly == 0.0 {
            OrderCount::Finite(0)
        } else {
            OrderCount::Finite(ceil_orders(model.fixed_costs_monthly, margin))
        }
    } else {
        no_finite_volume(margin)
    };

    debug!(
        fixed_costs = model.fixed_costs_monthly,
        margin,
        ?orders_needed,
        "computed breakeven"
    );

    BreakevenResult {
        orders_needed,
        contribution_margin: margin,
        price_per_order: model.price_per_order,
    }
}

/// Orders needed to earn `target_profit` on top of fixed costs.
///
/// Only meaningful for positive targets; callers treat a zero or negative
/// target as "0 orders" before reaching this function.
pub fn compute_orders_for_profit(
    fixed_costs: Option<f64>,
    price: Option<f64>,
    variable_cost: Option<f64>,
    target_profit: Option<f64>,
) -> CalcResult<OrderCount> {
    let model = CostModel::from_inputs(fixed_costs, price, variable_cost)?;
    let target = require(target_profit, "target profit")?;
    orders_for_profit(&model, target)
}

pub fn orders_for_profit(model: &CostModel, target_profit: f64) -> CalcResult<OrderCount> {
    if target_profit <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "target profit must be positive (got {target_profit})"
        )));
    }

    let margin = model.contribution_margin();
    let orders = if margin > 0.0 {
        OrderCount::Finite(ceil_orders(
            model.fixed_costs_monthly + target_profit,
            margin,
        ))
    } else {
        no_finite_volume(margin)
    };

    debug!(target_profit, margin, ?orders, "computed orders for target profit");
    Ok(orders)
}

fn no_finite_volume(margin: f64) -> OrderCount {
    if margin == 0.0 {
        warn!("contribution margin is zero; target volume is unreachable");
        OrderCount::Unreachable
    } else {
        warn!(margin, "contribution margin is negative; target volume is undefined");
        OrderCount::Undefined
    }
}

/// Smallest order count whose margin covers `amount`.
///
/// Float noise just above an integer (`1.1 / 0.1 = 11.000000000000002`) snaps
/// back to that integer, but only when it still covers `amount`.
fn ceil_orders(amount: f64, margin: f64) -> u64 {
    let raw = amount / margin;
    let nearest = raw.round();
    if (raw - nearest).abs() < 1e-9 && nearest * margin >= amount {
        nearest as u64
    } else {
        raw.ceil() as u64
    }
}
