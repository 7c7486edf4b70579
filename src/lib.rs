//! Dress Profit Calculator
//!
//! Unit economics, breakeven volumes and multi-month projections for a
//! dress rental and resale business.

pub mod addon_spec;
pub mod breakeven;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod projection;
pub mod report;
pub mod scenario;
pub mod unit_economics;

pub use error::{CalcError, CalcResult};
pub use models::{
    Addon, BreakevenResult, BreakevenWeek, CostModel, DressEconomics, MonthlySummary, OrderCount,
    ProjectionInputs, ProjectionRow,
};
