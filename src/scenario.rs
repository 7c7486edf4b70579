//! Scenario snapshots and side-by-side comparison
//!
//! A scenario owns a copy of every input and derived value at the time it
//! was captured, so later input changes never alter it. The saved scenario
//! is held by the caller and passed in explicitly.

use crate::models::{BreakevenResult, BreakevenWeek, CostModel, OrderCount};
use crate::projection::Projection;
use crate::report::format_currency;

/// A single named value in a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioValue {
    Amount(f64),
    Count(u64),
    Percent(f64),
    /// Valid inputs with no finite answer.
    Infinite,
    Undefined,
    /// A projection whose cumulative profit never turns non-negative.
    NotReached,
}

impl ScenarioValue {
    pub fn amount(value: Option<f64>) -> Self {
        value.map_or(ScenarioValue::Undefined, ScenarioValue::Amount)
    }

    pub fn numeric(&self) -> Option<f64> {
        match self {
            ScenarioValue::Amount(v) | ScenarioValue::Percent(v) => Some(*v),
            ScenarioValue::Count(n) => Some(*n as f64),
            ScenarioValue::Infinite | ScenarioValue::Undefined | ScenarioValue::NotReached => None,
        }
    }

    pub fn render(&self, currency: &str) -> String {
        match self {
            ScenarioValue::Amount(v) => format_currency(*v, currency),
            ScenarioValue::Count(n) => n.to_string(),
            ScenarioValue::Percent(v) => format!("{v:.1}%"),
            ScenarioValue::Infinite => "Infinite".to_string(),
            ScenarioValue::Undefined => "N/A".to_string(),
            ScenarioValue::NotReached => "Not reached".to_string(),
        }
    }

    /// Storage tag and numeric payload.
    pub fn to_parts(&self) -> (&'static str, Option<f64>) {
        match self {
            ScenarioValue::Amount(v) => ("amount", Some(*v)),
            ScenarioValue::Count(n) => ("count", Some(*n as f64)),
            ScenarioValue::Percent(v) => ("percent", Some(*v)),
            ScenarioValue::Infinite => ("infinite", None),
            ScenarioValue::Undefined => ("undefined", None),
            ScenarioValue::NotReached => ("not_reached", None),
        }
    }

    /// Inverse of `to_parts`. Unknown tags or missing payloads read as `Undefined`.
    pub fn from_parts(kind: &str, value: Option<f64>) -> Self {
        match (kind, value) {
            ("amount", Some(v)) => ScenarioValue::Amount(v),
            ("count", Some(v)) if v >= 0.0 => ScenarioValue::Count(v as u64),
            ("percent", Some(v)) => ScenarioValue::Percent(v),
            ("infinite", _) => ScenarioValue::Infinite,
            ("not_reached", _) => ScenarioValue::NotReached,
            _ => ScenarioValue::Undefined,
        }
    }
}

impl From<OrderCount> for ScenarioValue {
    fn from(count: OrderCount) -> Self {
        match count {
            OrderCount::Finite(n) => ScenarioValue::Count(n),
            OrderCount::Unreachable => ScenarioValue::Infinite,
            OrderCount::Undefined => ScenarioValue::Undefined,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioField {
    pub name: String,
    pub value: ScenarioValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub fields: Vec<ScenarioField>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Set a field, replacing any earlier value with the same name.
    pub fn with(mut self, name: &str, value: ScenarioValue) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value;
        } else {
            self.fields.push(ScenarioField {
                name: name.to_string(),
                value,
            });
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<ScenarioValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value)
    }

    /// Snapshot of an order plan: inputs, breakeven, optional target and projection.
    pub fn capture(
        name: impl Into<String>,
        costs: &CostModel,
        breakeven: &BreakevenResult,
        target: Option<(f64, OrderCount)>,
        projection: Option<&Projection>,
    ) -> Self {
        let mut scenario = Scenario::new(name)
            .with("Fixed Costs (Monthly)", ScenarioValue::Amount(costs.fixed_costs_monthly))
            .with("Price per Order", ScenarioValue::Amount(costs.price_per_order))
            .with("Variable Cost per Order", ScenarioValue::Amount(costs.variable_cost_per_order))
            .with("Contribution Margin", ScenarioValue::Amount(breakeven.contribution_margin))
            .with(
                "Contribution Margin %",
                ScenarioValue::Percent(costs.contribution_margin_percent()),
            )
            .with("Breakeven Orders", breakeven.orders_needed.into())
            .with("Breakeven Revenue", ScenarioValue::amount(breakeven.revenue_needed()));

        if let Some((target_profit, orders)) = target {
            scenario = scenario
                .with("Target Profit", ScenarioValue::Amount(target_profit))
                .with("Orders for Target", orders.into())
                .with(
                    "Revenue for Target",
                    ScenarioValue::amount(orders.revenue_at(costs.price_per_order)),
                );
        }

        if let Some(projection) = projection {
            let totals = projection.totals();
            let breakeven_week = match projection.breakeven_week() {
                BreakevenWeek::Reached { week, .. } => ScenarioValue::Count(u64::from(week)),
                BreakevenWeek::NotReached => ScenarioValue::NotReached,
            };
            scenario = scenario
                .with(
                    "Starting Orders (Monthly)",
                    ScenarioValue::Amount(projection.inputs.start_orders_monthly),
                )
                .with(
                    "Projection Months",
                    ScenarioValue::Count(u64::from(projection.inputs.months)),
                )
                .with(
                    "Monthly Growth",
                    ScenarioValue::Percent(projection.inputs.growth_rate_percent),
                )
                .with("Projected Revenue", ScenarioValue::Amount(totals.revenue))
                .with("Projected Profit", ScenarioValue::Amount(totals.profit))
                .with("Breakeven Week", breakeven_week);
        }

        scenario
    }
}

/// One line of a side-by-side comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub field: String,
    pub current: String,
    pub saved: String,
    /// `current - saved` when both sides are numeric.
    pub difference: Option<f64>,
}

/// Compare the current scenario with an optional saved one, matching fields by name.
pub fn compare(current: &Scenario, saved: Option<&Scenario>, currency: &str) -> Vec<ComparisonRow> {
    let mut names: Vec<&str> = current.fields.iter().map(|f| f.name.as_str()).collect();
    if let Some(saved) = saved {
        for field in &saved.fields {
            if !names.contains(&field.name.as_str()) {
                names.push(&field.name);
            }
        }
    }

    let render = |value: Option<ScenarioValue>| {
        value.map_or_else(|| "N/A".to_string(), |v| v.render(currency))
    };

    names
        .into_iter()
        .map(|name| {
            let now = current.get(name);
            let before = saved.and_then(|s| s.get(name));
            let difference = match (now.and_then(|v| v.numeric()), before.and_then(|v| v.numeric())) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            };
            ComparisonRow {
                field: name.to_string(),
                current: render(now),
                saved: render(before),
                difference,
            }
        })
        .collect()
}
