//! Warehouse efficiency views.
//!
//! The advisor turns utilization ratios into a sizing recommendation; the
//! unused list ranks warehouses by spend and flags those with no queries.

use serde::{Deserialize, Serialize};
use sl_store::{WarehouseCredits, WarehouseLoad};

/// Ratio cut-offs used by [`advise`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AdvisorThresholds {
    /// Queued load at or above this means queries are waiting on compute.
    pub investigate_queued_load: f64,
    /// Running ratio below this suggests dropping two sizes.
    pub downsize_two_below: f64,
    /// Running ratio below this suggests dropping one size.
    pub downsize_one_below: f64,
}

impl Default for AdvisorThresholds {
    fn default() -> Self {
        Self {
            investigate_queued_load: 0.10,
            downsize_two_below: 0.05,
            downsize_one_below: 0.15,
        }
    }
}

/// Sizing recommendation for a warehouse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    DownsizeTwoSteps,
    DownsizeOneStep,
    InvestigateQueuing,
    NoAction,
}

impl Recommendation {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::DownsizeTwoSteps => "Downsizing by 2 steps (very low utilization)",
            Recommendation::DownsizeOneStep => "Downsizing by 1 step (low utilization)",
            Recommendation::InvestigateQueuing => {
                "Investigate query queuing; consider upsizing or optimizing queries"
            }
            Recommendation::NoAction => "No immediate action suggested",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverProvisioningAdvice {
    pub name: String,
    pub current_size: String,
    pub avg_running_ratio: f64,
    pub avg_queued_load: f64,
    pub recommendation: Recommendation,
    pub message: String,
}

/// Recommend a sizing change from a warehouse's utilization.
///
/// Queuing takes precedence: a warehouse with waiting queries is never told
/// to shrink.
pub fn advise(load: &WarehouseLoad, thresholds: &AdvisorThresholds) -> OverProvisioningAdvice {
    let recommendation = if load.avg_queued_load >= thresholds.investigate_queued_load {
        Recommendation::InvestigateQueuing
    } else if load.avg_running_ratio < thresholds.downsize_two_below {
        Recommendation::DownsizeTwoSteps
    } else if load.avg_running_ratio < thresholds.downsize_one_below {
        Recommendation::DownsizeOneStep
    } else {
        Recommendation::NoAction
    };

    OverProvisioningAdvice {
        name: load.name.clone(),
        current_size: load.current_size.clone(),
        avg_running_ratio: load.avg_running_ratio,
        avg_queued_load: load.avg_queued_load,
        recommendation,
        message: recommendation.message().to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnusedWarehouse {
    pub name: String,
    pub compute_credits_used: f64,
    pub query_count: i64,
    /// Absent when the warehouse ran no queries.
    pub credits_per_query: Option<f64>,
    /// Spend relative to the most expensive warehouse, 0..=100.
    pub usage_pct: u32,
    pub unused: bool,
}

/// Credits-per-query and relative spend for each warehouse, in input order.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unused_warehouses(credits: &[WarehouseCredits]) -> Vec<UnusedWarehouse> {
    let max_credits = credits
        .iter()
        .map(|row| row.compute_credits_used)
        .fold(1.0_f64, f64::max);

    credits
        .iter()
        .map(|row| {
            let credits_per_query = (row.query_count > 0)
                .then(|| row.compute_credits_used / row.query_count as f64);
            let ratio = (row.compute_credits_used / max_credits * 100.0).round();
            UnusedWarehouse {
                name: row.name.clone(),
                compute_credits_used: row.compute_credits_used,
                query_count: row.query_count,
                credits_per_query,
                usage_pct: ratio.clamp(0.0, 100.0) as u32,
                unused: row.query_count == 0,
            }
        })
        .collect()
}
