//! Per-dress profit and margin calculations
//!
//! A dress is bought, rented out a few times and finally resold. A share of
//! sales also carries a set of personalized add-ons.

use tracing::{debug, warn};

use crate::error::{CalcError, CalcResult};
use crate::models::DressEconomics;

/// Profit breakdown for one dress cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DressCycleReport {
    pub sale_profit: f64,
    pub rental_profit: f64,
    pub base_cycle_profit: f64,
    pub total_cycle_revenue: f64,
    /// Zero when `margin_defined` is false.
    pub overall_margin_percent: f64,
    pub margin_defined: bool,
    /// Profit of each add-on, in input order.
    pub addon_profits: Vec<(String, f64)>,
    pub addon_set_profit: f64,
    pub simple_sale_profit: f64,
    pub personalized_sale_profit: f64,
    pub average_profit_per_sale: f64,
    pub personalized_percent: f64,
}

/// Compute the profit breakdown for one dress cycle.
pub fn analyze_dress(dress: &DressEconomics) -> CalcResult<DressCycleReport> {
    validate(dress)?;

    let sale_profit = dress.resale_price - dress.purchase_cost;
    let rental_profit = dress.avg_rental_price * dress.avg_rentals_per_dress;
    let base_cycle_profit = sale_profit + rental_profit;

    let total_cycle_revenue = rental_profit + dress.resale_price;
    let (overall_margin_percent, margin_defined) = if total_cycle_revenue <= 0.0 {
        warn!("dress cycle has no revenue; margin is undefined");
        (0.0, false)
    } else {
        (base_cycle_profit / total_cycle_revenue * 100.0, true)
    };

    let addon_profits: Vec<(String, f64)> = dress
        .addons
        .iter()
        .map(|a| (a.name.clone(), a.profit()))
        .collect();
    let addon_set_profit: f64 = addon_profits.iter().map(|(_, p)| p).sum();

    let simple_sale_profit = base_cycle_profit;
    let personalized_sale_profit = base_cycle_profit + addon_set_profit;
    let average_profit_per_sale =
        weighted_average_profit(base_cycle_profit, addon_set_profit, dress.personalized_percent);

    debug!(
        base_cycle_profit,
        addon_set_profit, average_profit_per_sale, "analyzed dress cycle"
    );

    Ok(DressCycleReport {
        sale_profit,
        rental_profit,
        base_cycle_profit,
        total_cycle_revenue,
        overall_margin_percent,
        margin_defined,
        addon_profits,
        addon_set_profit,
        simple_sale_profit,
        personalized_sale_profit,
        average_profit_per_sale,
        personalized_percent: dress.personalized_percent,
    })
}

/// Average profit per sale when `personalized_percent` of sales carry the add-on set.
pub fn weighted_average_profit(base_cycle_profit: f64, addon_set_profit: f64, personalized_percent: f64) -> f64 {
    let personalized = personalized_percent / 100.0;
    personalized * (base_cycle_profit + addon_set_profit) + (1.0 - personalized) * base_cycle_profit
}

/// Number of sales needed to reach `target_profit` at the given average profit.
pub fn sales_to_target(average_profit_per_sale: f64, target_profit: f64) -> CalcResult<u64> {
    if !average_profit_per_sale.is_finite() || !target_profit.is_finite() {
        return Err(CalcError::InvalidInput(format!(
            "sales target needs finite inputs (average profit {average_profit_per_sale}, target {target_profit})"
        )));
    }
    if average_profit_per_sale <= 0.0 {
        if target_profit <= 0.0 {
            return Ok(0);
        }
        warn!(average_profit_per_sale, target_profit, "target unreachable");
        return Err(CalcError::UnreachableTarget {
            average_profit: average_profit_per_sale,
        });
    }
    if target_profit <= 0.0 {
        return Ok(0);
    }
    Ok((target_profit / average_profit_per_sale).ceil() as u64)
}

fn validate(dress: &DressEconomics) -> CalcResult<()> {
    let fields = [
        ("purchase cost", dress.purchase_cost),
        ("resale price", dress.resale_price),
        ("average rental price", dress.avg_rental_price),
        ("average rentals per dress", dress.avg_rentals_per_dress),
        ("personalized percentage", dress.personalized_percent),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(CalcError::InvalidInput(format!("{name} is not finite ({value})")));
        }
    }
    for addon in &dress.addons {
        if !addon.price.is_finite() || !addon.cost.is_finite() {
            return Err(CalcError::InvalidInput(format!(
                "add-on '{}' has a non-finite price or cost",
                addon.name
            )));
        }
    }
    if !(0.0..=100.0).contains(&dress.personalized_percent) {
        return Err(CalcError::InvalidInput(format!(
            "personalized percentage must be within 0..=100 (got {})",
            dress.personalized_percent
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Addon;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn default_dress() -> DressEconomics {
        DressEconomics {
            purchase_cost: 115.0,
            resale_price: 180.0,
            avg_rental_price: 45.0,
            avg_rentals_per_dress: 1.5,
            addons: vec![Addon::new("Gap", 15.0, 10.0), Addon::new("Scarf", 25.0, 10.0)],
            personalized_percent: 75.0,
        }
    }

    #[test]
    fn default_dress_breakdown() {
        let report = analyze_dress(&default_dress()).unwrap();
        assert_close(report.sale_profit, 65.0);
        assert_close(report.rental_profit, 67.5);
        assert_close(report.base_cycle_profit, 132.5);
        assert_close(report.total_cycle_revenue, 247.5);
        assert!(report.margin_defined);
        assert_close(report.overall_margin_percent, 132.5 / 247.5 * 100.0);
        assert_close(report.addon_set_profit, 20.0);
        assert_close(report.personalized_sale_profit, 152.5);
        // 0.75 * 152.5 + 0.25 * 132.5
        assert_close(report.average_profit_per_sale, 147.5);
        assert_eq!(report.addon_profits[1], ("Scarf".to_string(), 15.0));
    }

    #[test]
    fn margin_undefined_without_revenue() {
        let dress = DressEconomics {
            purchase_cost: 50.0,
            resale_price: 0.0,
            avg_rental_price: 0.0,
            avg_rentals_per_dress: 3.0,
            addons: Vec::new(),
            personalized_percent: 0.0,
        };
        let report = analyze_dress(&dress).unwrap();
        assert!(!report.margin_defined);
        assert_eq!(report.overall_margin_percent, 0.0);
        assert_close(report.base_cycle_profit, -50.0);
    }

    #[test]
    fn rejects_out_of_range_percentage() {
        let mut dress = default_dress();
        dress.personalized_percent = 120.0;
        assert!(matches!(analyze_dress(&dress), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn sales_to_target_rounds_up() {
        assert_eq!(sales_to_target(147.5, 30000.0), Ok(204));
        assert_eq!(sales_to_target(100.0, 1000.0), Ok(10));
    }

    #[test]
    fn sales_to_target_non_positive_cases() {
        assert_eq!(sales_to_target(147.5, 0.0), Ok(0));
        assert_eq!(sales_to_target(-3.0, 0.0), Ok(0));
        assert_eq!(sales_to_target(0.0, -10.0), Ok(0));
        assert_eq!(
            sales_to_target(-3.0, 500.0),
            Err(CalcError::UnreachableTarget { average_profit: -3.0 })
        );
    }

    #[test]
    fn sales_to_target_rejects_non_finite_inputs() {
        for (average, target) in [
            (147.5, f64::NAN),
            (f64::NAN, 1000.0),
            (147.5, f64::INFINITY),
            (f64::INFINITY, 1000.0),
            (f64::NEG_INFINITY, 0.0),
        ] {
            assert!(
                matches!(sales_to_target(average, target), Err(CalcError::InvalidInput(_))),
                "average {average}, target {target}"
            );
        }
    }
}
