//! Text rendering of calculator results

use std::fmt;

use crate::error::CalcResult;
use crate::models::{BreakevenResult, BreakevenWeek, CostModel, MonthlySummary, OrderCount, ProjectionRow};
use crate::projection::Projection;
use crate::scenario::ComparisonRow;
use crate::unit_economics::DressCycleReport;

/// Format an amount with thousands separators and two decimals, e.g. `12,000.00 MAD`.
pub fn format_currency(value: f64, currency: &str) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" would read oddly
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}.{fraction}")
    } else {
        format!("{sign}{grouped}.{fraction} {currency}")
    }
}

impl fmt::Display for OrderCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderCount::Finite(n) => write!(f, "{n}"),
            OrderCount::Unreachable => write!(f, "Infinite"),
            OrderCount::Undefined => write!(f, "N/A"),
        }
    }
}

impl fmt::Display for BreakevenWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakevenWeek::Reached { week, month } => write!(f, "week {week} (month {month})"),
            BreakevenWeek::NotReached => write!(f, "not reached within the projection"),
        }
    }
}

/// Dress-cycle breakdown and the sales needed for a profit target.
pub struct DressReport<'a> {
    pub cycle: &'a DressCycleReport,
    pub target_profit: f64,
    pub sales_needed: &'a CalcResult<u64>,
    pub currency: &'a str,
}

impl fmt::Display for DressReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = |v: f64| format_currency(v, self.currency);
        let cycle = self.cycle;

        writeln!(f, "=== Dress Cycle ===")?;
        writeln!(f, "  Profit from final sale:   {}", money(cycle.sale_profit))?;
        writeln!(f, "  Rental profit per dress:  {}", money(cycle.rental_profit))?;
        writeln!(f, "  Base profit per cycle:    {}", money(cycle.base_cycle_profit))?;
        if cycle.margin_defined {
            writeln!(f, "  Overall margin:           {:.1}%", cycle.overall_margin_percent)?;
        } else {
            writeln!(f, "  Overall margin:           0.0% (cannot calculate margin: no revenue)")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Add-ons ===")?;
        for (name, profit) in &cycle.addon_profits {
            writeln!(f, "  Profit per {name}: {}", money(*profit))?;
        }
        writeln!(f, "  Profit per add-on set:    {}", money(cycle.addon_set_profit))?;
        writeln!(f)?;

        writeln!(f, "=== Average Profit per Sale ===")?;
        writeln!(f, "  Simple sale:              {}", money(cycle.simple_sale_profit))?;
        writeln!(f, "  Personalized sale:        {}", money(cycle.personalized_sale_profit))?;
        writeln!(
            f,
            "  Weighted ({:.0}% personalized): {}",
            cycle.personalized_percent,
            money(cycle.average_profit_per_sale)
        )?;
        writeln!(f)?;

        writeln!(f, "=== Sales Target ===")?;
        match self.sales_needed {
            Ok(0) if self.target_profit <= 0.0 => writeln!(
                f,
                "  Target is {} or less: 0 dress sales needed",
                money(self.target_profit)
            ),
            Ok(n) => writeln!(f, "  Dress sales needed for {}: {n}", money(self.target_profit)),
            Err(e) => writeln!(f, "  {e}"),
        }
    }
}

/// Breakeven volume and, when given, the target-profit volume.
pub struct BreakevenReport<'a> {
    pub costs: &'a CostModel,
    pub breakeven: &'a BreakevenResult,
    pub target: Option<(f64, OrderCount)>,
    pub currency: &'a str,
}

impl fmt::Display for BreakevenReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = |v: f64| format_currency(v, self.currency);
        let revenue = |v: Option<f64>| v.map_or_else(|| "N/A".to_string(), money);
        let costs = self.costs;

        writeln!(f, "=== Breakeven ===")?;
        writeln!(f, "  Fixed costs (monthly):    {}", money(costs.fixed_costs_monthly))?;
        writeln!(f, "  Price per order:          {}", money(costs.price_per_order))?;
        writeln!(f, "  Variable cost per order:  {}", money(costs.variable_cost_per_order))?;
        writeln!(
            f,
            "  Contribution margin:      {} ({:.1}%)",
            money(self.breakeven.contribution_margin),
            costs.contribution_margin_percent()
        )?;
        writeln!(f, "  Orders needed:            {}", self.breakeven.orders_needed)?;
        writeln!(f, "  Revenue needed:           {}", revenue(self.breakeven.revenue_needed()))?;

        if let Some((target_profit, orders)) = self.target {
            writeln!(f)?;
            writeln!(f, "=== Target Profit {} ===", money(target_profit))?;
            writeln!(f, "  Orders needed:            {orders}")?;
            writeln!(
                f,
                "  Revenue needed:           {}",
                revenue(orders.revenue_at(costs.price_per_order))
            )?;
        }

        Ok(())
    }
}

/// Weekly rows as a fixed-width table.
pub struct WeeklyTable<'a> {
    pub rows: &'a [ProjectionRow],
    pub currency: &'a str,
}

impl fmt::Display for WeeklyTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>5} {:>5} {:>9} {:>16} {:>16} {:>14} {:>16} {:>18}",
            "Month", "Week", "Orders", "Revenue", "Variable", "Fixed", "Profit", "Cumulative"
        )?;
        writeln!(f, "{}", "-".repeat(106))?;
        for row in self.rows {
            writeln!(
                f,
                "{:>5} {:>5} {:>9.1} {:>16} {:>16} {:>14} {:>16} {:>18}",
                row.month,
                row.global_week,
                row.orders_this_week,
                format_currency(row.revenue, ""),
                format_currency(row.variable_costs, ""),
                format_currency(row.fixed_costs_weekly, ""),
                format_currency(row.profit, ""),
                format_currency(row.cumulative_profit, ""),
            )?;
        }
        writeln!(f, "(amounts in {})", self.currency)
    }
}

/// Monthly summaries as a fixed-width table.
pub struct MonthlyTable<'a> {
    pub months: &'a [MonthlySummary],
    pub currency: &'a str,
}

impl fmt::Display for MonthlyTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>5} {:>9} {:>16} {:>16} {:>14} {:>16} {:>18}",
            "Month", "Orders", "Revenue", "Variable", "Fixed", "Profit", "Cumulative"
        )?;
        writeln!(f, "{}", "-".repeat(100))?;
        for m in self.months {
            writeln!(
                f,
                "{:>5} {:>9.1} {:>16} {:>16} {:>14} {:>16} {:>18}",
                m.month,
                m.orders,
                format_currency(m.revenue, ""),
                format_currency(m.variable_costs, ""),
                format_currency(m.fixed_costs, ""),
                format_currency(m.profit, ""),
                format_currency(m.ending_cumulative_profit, ""),
            )?;
        }
        writeln!(f, "(amounts in {})", self.currency)
    }
}

/// Headline figures of a projection.
pub struct ProjectionSummary<'a> {
    pub projection: &'a Projection,
    pub currency: &'a str,
}

impl fmt::Display for ProjectionSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = |v: f64| format_currency(v, self.currency);
        let totals = self.projection.totals();
        let inputs = &self.projection.inputs;

        writeln!(f, "=== Projection Summary ===")?;
        writeln!(
            f,
            "  {} months from {:.1} orders/month at {:+.1}% monthly growth",
            inputs.months, inputs.start_orders_monthly, inputs.growth_rate_percent
        )?;
        writeln!(f, "  Total orders:             {:.1}", totals.orders)?;
        writeln!(f, "  Total revenue:            {}", money(totals.revenue))?;
        writeln!(f, "  Total profit:             {}", money(totals.profit))?;
        writeln!(f, "  Ending cumulative profit: {}", money(totals.ending_cumulative_profit))?;
        writeln!(f, "  Cumulative breakeven:     {}", self.projection.breakeven_week())
    }
}

/// Side-by-side scenario comparison.
pub struct ComparisonTable<'a> {
    pub rows: &'a [ComparisonRow],
    pub current_name: &'a str,
    pub saved_name: &'a str,
}

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<28} {:>22} {:>22} {:>14}",
            "Field", self.current_name, self.saved_name, "Difference"
        )?;
        writeln!(f, "{}", "-".repeat(89))?;
        for row in self.rows {
            let difference = row
                .difference
                .map_or_else(|| "-".to_string(), |d| format!("{d:+.2}"));
            writeln!(
                f,
                "{:<28} {:>22} {:>22} {:>14}",
                row.field, row.current, row.saved, difference
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakeven::breakeven_for;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0, "MAD"), "0.00 MAD");
        assert_eq!(format_currency(999.999, "MAD"), "1,000.00 MAD");
        assert_eq!(format_currency(90000.0, "MAD"), "90,000.00 MAD");
        assert_eq!(format_currency(1234567.891, ""), "1,234,567.89");
        assert_eq!(format_currency(-2769.2307, "MAD"), "-2,769.23 MAD");
        assert_eq!(format_currency(-0.001, "MAD"), "0.00 MAD");
    }

    #[test]
    fn order_count_display() {
        assert_eq!(OrderCount::Finite(217).to_string(), "217");
        assert_eq!(OrderCount::Unreachable.to_string(), "Infinite");
        assert_eq!(OrderCount::Undefined.to_string(), "N/A");
    }

    #[test]
    fn breakeven_report_marks_unreachable() {
        let costs = CostModel::new(12000.0, 450.0, 450.0).unwrap();
        let breakeven = breakeven_for(&costs);
        let text = BreakevenReport {
            costs: &costs,
            breakeven: &breakeven,
            target: Some((1000.0, OrderCount::Unreachable)),
            currency: "MAD",
        }
        .to_string();
        assert!(text.contains("Orders needed:            Infinite"));
        assert!(text.contains("Revenue needed:           N/A"));
        assert!(text.contains("Target Profit 1,000.00 MAD"));
    }

    #[test]
    fn dress_report_lists_addons_and_target() {
        let dress = crate::models::DressEconomics {
            purchase_cost: 115.0,
            resale_price: 180.0,
            avg_rental_price: 45.0,
            avg_rentals_per_dress: 1.5,
            addons: vec![crate::models::Addon::new("Scarf", 25.0, 10.0)],
            personalized_percent: 0.0,
        };
        let cycle = crate::unit_economics::analyze_dress(&dress).unwrap();
        let sales: CalcResult<u64> = Ok(227);
        let text = DressReport {
            cycle: &cycle,
            target_profit: 30000.0,
            sales_needed: &sales,
            currency: "MAD",
        }
        .to_string();
        assert!(text.contains("Base profit per cycle:    132.50 MAD"));
        assert!(text.contains("Profit per Scarf: 15.00 MAD"));
        assert!(text.contains("Dress sales needed for 30,000.00 MAD: 227"));
    }

    #[test]
    fn comparison_table_shows_missing_difference_as_dash() {
        let rows = [ComparisonRow {
            field: "Breakeven Week".to_string(),
            current: "Not reached".to_string(),
            saved: "13".to_string(),
            difference: None,
        }];
        let text = ComparisonTable {
            rows: &rows,
            current_name: "current",
            saved_name: "baseline",
        }
        .to_string();
        let line = text.lines().nth(2).unwrap();
        assert!(line.starts_with("Breakeven Week"));
        assert!(line.contains("Not reached"));
        assert!(line.trim_end().ends_with('-'));
    }
}
