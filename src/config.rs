// ⚙️ Engine Configuration - Costing constants as data
//
// Defaults reproduce the dashboard's fixed constants. A JSON file may
// override any subset of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hours in a standard month, for the estimated monthly payroll cost
    pub standard_monthly_hours: f64,

    /// Paid hours per approved leave day
    pub leave_hours_per_day: f64,

    /// Average days per month, for pro-rating depreciation over a period
    pub average_days_per_month: f64,

    /// Reorder threshold meaning "never alert"
    pub reorder_sentinel: i64,

    /// Balances smaller than this are treated as zero on the balance sheet
    pub balance_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            standard_monthly_hours: 160.0,
            leave_hours_per_day: 8.0,
            average_days_per_month: 30.44,
            reorder_sentinel: 9999,
            balance_tolerance: 0.01,
        }
    }
}

impl EngineConfig {
    /// Load overrides from a JSON file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: EngineConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }
}
