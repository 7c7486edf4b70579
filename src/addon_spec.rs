//! Parsing of add-on specifications given on the command line
//!
//! An add-on is written `NAME:PRICE:COST`, e.g. `Scarf:25:10`. `NAME=PRICE/COST`
//! is accepted as well.

use anyhow::{Result, anyhow};
use regex::Regex;

use crate::models::Addon;

/// Parse a single `NAME:PRICE:COST` add-on.
pub fn parse_addon(spec: &str) -> Result<Addon> {
    let addon_re = Regex::new(r"^\s*([^:=]*[^\s:=])\s*[:=]\s*(\d+(?:\.\d+)?)\s*[:/]\s*(\d+(?:\.\d+)?)\s*$")?;

    let cap = addon_re
        .captures(spec)
        .ok_or_else(|| anyhow!("Invalid add-on '{}': expected NAME:PRICE:COST", spec))?;

    let price: f64 = cap[2].parse()?;
    let cost: f64 = cap[3].parse()?;
    Ok(Addon::new(&cap[1], price, cost))
}

/// Parse a list of add-on specifications, rejecting duplicate names.
pub fn parse_addons<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Addon>> {
    let mut addons: Vec<Addon> = Vec::new();
    for spec in specs {
        let addon = parse_addon(spec.as_ref())?;
        if addons.iter().any(|a| a.name.eq_ignore_ascii_case(&addon.name)) {
            return Err(anyhow!("Add-on '{}' given more than once", addon.name));
        }
        addons.push(addon);
    }
    Ok(addons)
}
