//! Dress Profit Calculator
//!
//! Command-line front end for unit economics, breakeven and projections.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use dress_profit_calculator::addon_spec::parse_addons;
use dress_profit_calculator::breakeven::{breakeven_for, orders_for_profit};
use dress_profit_calculator::models::monthly_fixed_costs;
use dress_profit_calculator::projection::{project, seed_volume};
use dress_profit_calculator::scenario::{Scenario, compare};
use dress_profit_calculator::unit_economics::{analyze_dress, sales_to_target};
use dress_profit_calculator::report::{
    BreakevenReport, ComparisonTable, DressReport, MonthlyTable, ProjectionSummary, WeeklyTable,
};
use dress_profit_calculator::{CostModel, DressEconomics, OrderCount, ProjectionInputs, db, export};

#[derive(Parser)]
#[command(name = "dress-profit-calculator")]
#[command(about = "Breakeven and profit projections for a dress rental business")]
struct Cli {
    /// Path to the SQLite database holding saved scenarios
    #[arg(short, long, default_value = "profit_calc.db")]
    database: PathBuf,

    /// Currency label used in reports
    #[arg(long, default_value = "MAD")]
    currency: String,

    /// Log calculation details to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CostArgs {
    /// Monthly fixed costs paid as a lump sum (e.g. ad spend)
    #[arg(long, default_value = "3000")]
    fixed_costs: f64,

    /// Fixed costs paid per day (e.g. wages)
    #[arg(long, default_value = "300")]
    daily_costs: f64,

    /// Days per month used for daily costs
    #[arg(long, default_value = "30")]
    days_per_month: u32,

    /// Price per order
    #[arg(long, default_value = "450")]
    price: f64,

    /// Variable cost per order [default: 390]
    #[arg(long, conflicts_with = "variable_cost_percent")]
    variable_cost: Option<f64>,

    /// Variable cost per order as a percentage of the price
    #[arg(long)]
    variable_cost_percent: Option<f64>,
}

impl CostArgs {
    fn cost_model(&self) -> Result<CostModel> {
        let fixed = monthly_fixed_costs(self.fixed_costs, self.daily_costs, self.days_per_month);
        let model = match (self.variable_cost, self.variable_cost_percent) {
            (_, Some(percent)) => CostModel::with_variable_percent(fixed, self.price, percent)?,
            (variable, None) => CostModel::new(fixed, self.price, variable.unwrap_or(390.0))?,
        };
        Ok(model)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Profit per dress cycle and dress sales needed for a profit target
    Dress {
        /// Overall profit target
        #[arg(short, long, default_value = "30000")]
        target_profit: f64,

        /// Purchase cost per dress
        #[arg(long, default_value = "115")]
        dress_cost: f64,

        /// Selling price after rentals
        #[arg(long, default_value = "180")]
        resale_price: f64,

        /// Average rental price per hire
        #[arg(long, default_value = "45")]
        rental_price: f64,

        /// Average rentals before selling
        #[arg(long, default_value = "1.5")]
        rentals_per_dress: f64,

        /// Add-on as NAME:PRICE:COST (repeatable)
        #[arg(long = "addon", default_values = ["Gap:15:10", "Scarf:25:10"])]
        addons: Vec<String>,

        /// Percentage of dress sales including the add-on set
        #[arg(long, default_value = "75")]
        personalized_percent: f64,
    },

    /// Orders needed to break even, and optionally to reach a profit target
    Breakeven {
        #[command(flatten)]
        costs: CostArgs,

        /// Monthly profit target
        #[arg(short, long)]
        target_profit: Option<f64>,

        /// Save the inputs and results as a named scenario
        #[arg(long)]
        save: Option<String>,
    },

    /// Weekly and monthly projection of orders and profit
    Project {
        #[command(flatten)]
        costs: CostArgs,

        /// Starting monthly order volume [default: breakeven volume]
        #[arg(long, conflicts_with = "from_target")]
        start_orders: Option<f64>,

        /// Start from the volume needed for this monthly profit target
        #[arg(long)]
        from_target: Option<f64>,

        /// Number of months to project
        #[arg(short, long, default_value = "12")]
        months: u32,

        /// Monthly growth rate in percent (negative for decline)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        growth: f64,

        /// Print every simulated week
        #[arg(short, long)]
        weekly: bool,

        /// Write Weekly_Projections.csv and Monthly_Summary.csv into this directory
        #[arg(long)]
        export: Option<PathBuf>,

        /// Save the inputs and results as a named scenario
        #[arg(long)]
        save: Option<String>,
    },

    /// Compare a saved scenario side by side with another
    Compare {
        /// Scenario shown as current
        current: String,

        /// Scenario to compare against
        saved: Option<String>,
    },

    /// List saved scenarios
    Scenarios,

    /// Delete a saved scenario
    DeleteScenario {
        name: String,
    },

    /// Initialize empty database with schema
    Init,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    db::init_schema(&conn)?;
    Ok(conn)
}

/// Orders needed for a target, treating non-positive targets as zero orders.
fn target_orders(costs: &CostModel, target_profit: f64) -> Result<OrderCount> {
    if target_profit <= 0.0 {
        return Ok(OrderCount::Finite(0));
    }
    Ok(orders_for_profit(costs, target_profit)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let currency = cli.currency.as_str();

    match cli.command {
        Commands::Dress {
            target_profit,
            dress_cost,
            resale_price,
            rental_price,
            rentals_per_dress,
            addons,
            personalized_percent,
        } => {
            let dress = DressEconomics {
                purchase_cost: dress_cost,
                resale_price,
                avg_rental_price: rental_price,
                avg_rentals_per_dress: rentals_per_dress,
                addons: parse_addons(&addons)?,
                personalized_percent,
            };
            let cycle = analyze_dress(&dress)?;
            let sales = sales_to_target(cycle.average_profit_per_sale, target_profit);
            let dress_report = DressReport {
                cycle: &cycle,
                target_profit,
                sales_needed: &sales,
                currency,
            };
            print!("{}", dress_report);
        }

        Commands::Breakeven {
            costs,
            target_profit,
            save,
        } => {
            let model = costs.cost_model()?;
            let breakeven = breakeven_for(&model);
            let target = match target_profit {
                Some(t) => Some((t, target_orders(&model, t)?)),
                None => None,
            };

            let breakeven_report = BreakevenReport {
                costs: &model,
                breakeven: &breakeven,
                target,
                currency,
            };
            print!("{}", breakeven_report);

            if let Some(name) = save {
                let mut conn = open_database(&cli.database)?;
                let scenario = Scenario::capture(name, &model, &breakeven, target, None);
                db::save_scenario(&mut conn, &scenario)?;
                println!("\nSaved scenario '{}'", scenario.name);
            }
        }

        Commands::Project {
            costs,
            start_orders,
            from_target,
            months,
            growth,
            weekly,
            export: export_dir,
            save,
        } => {
            let model = costs.cost_model()?;
            let breakeven = breakeven_for(&model);
            let target = match from_target {
                Some(t) => Some((t, target_orders(&model, t)?)),
                None => None,
            };

            let start = seed_volume(&breakeven, target, start_orders)?;

            let inputs = ProjectionInputs {
                costs: model,
                start_orders_monthly: start,
                months,
                growth_rate_percent: growth,
            };
            let projection = project(&inputs)?;

            if weekly {
                let weekly_table = WeeklyTable {
                    rows: &projection.rows,
                    currency,
                };
                println!("{}", weekly_table);
            }
            let months = projection.monthly_summary();
            println!("{}", MonthlyTable { months: &months, currency });
            print!("{}", ProjectionSummary { projection: &projection, currency });

            if let Some(dir) = export_dir {
                let (weekly_path, monthly_path) = export::export_projection(&dir, &projection)?;
                println!("\nExported {} and {}", weekly_path.display(), monthly_path.display());
            }

            if let Some(name) = save {
                let mut conn = open_database(&cli.database)?;
                let scenario = Scenario::capture(name, &model, &breakeven, target, Some(&projection));
                db::save_scenario(&mut conn, &scenario)?;
                println!("\nSaved scenario '{}'", scenario.name);
            }
        }

        Commands::Compare { current, saved } => {
            let conn = open_database(&cli.database)?;
            let current_scenario = db::load_scenario(&conn, &current)?
                .ok_or_else(|| anyhow!("Scenario '{}' not found", current))?;
            let saved_scenario = match &saved {
                Some(name) => Some(
                    db::load_scenario(&conn, name)?.ok_or_else(|| anyhow!("Scenario '{}' not found", name))?,
                ),
                None => None,
            };

            let rows = compare(&current_scenario, saved_scenario.as_ref(), currency);
            let saved_name = saved.as_deref().unwrap_or("(none)");
            let table = ComparisonTable {
                rows: &rows,
                current_name: &current,
                saved_name,
            };
            print!("{}", table);
        }

        Commands::Scenarios => {
            let conn = open_database(&cli.database)?;
            let scenarios = db::list_scenarios(&conn)?;
            if scenarios.is_empty() {
                println!("No saved scenarios. Use --save with 'breakeven' or 'project' first.");
            } else {
                println!("{:<30} {:>20}", "Scenario", "Saved at");
                println!("{}", "-".repeat(51));
                for (name, created_at) in scenarios {
                    println!("{:<30} {:>20}", name, created_at);
                }
            }
        }

        Commands::DeleteScenario { name } => {
            let mut conn = open_database(&cli.database)?;
            if db::delete_scenario(&mut conn, &name)? {
                println!("Deleted scenario '{}'", name);
            } else {
                println!("Scenario '{}' not found", name);
            }
        }

        Commands::Init => {
            open_database(&cli.database)?;
            println!("Database initialized at: {}", cli.database.display());
        }
    }

    Ok(())
}
