//! `sl_query` - Summaries and derived views for snowlens
//!
//! This crate provides:
//! - The dashboard summary fold over users and activities
//! - Warehouse efficiency views (idle monitor, over-provisioning advisor,
//!   unused warehouse list)
//! - A [`QueryBuilder`] that runs these against a [`SnowStore`]

use serde::{Deserialize, Serialize};
use sl_store::decimal::{format_one_decimal, parse_hundredths_or_zero};
use sl_store::{SnowStore, SnowflakeUser, UserActivity, WarehouseActivity};
use tracing::debug;

pub mod efficiency;
pub use efficiency::{
    AdvisorThresholds, OverProvisioningAdvice, Recommendation, UnusedWarehouse, advise,
    unused_warehouses,
};

/// Aggregate counters shown on the dashboard overview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_users: usize,
    pub active_users: usize,
    /// Sum of activity credits, one decimal place.
    pub total_credits: String,
    pub total_queries: i64,
    /// Sum of activity data scanned, one decimal place.
    pub total_data_scanned: String,
}

/// Fold users and activities into a [`DashboardSummary`].
///
/// Missing or unparseable numeric fields count as zero. Decimal sums are
/// accumulated in hundredths, so the result does not depend on the order of
/// `activities`. Totals saturate instead of overflowing.
pub fn summarize<'a, I>(users: &[SnowflakeUser], activities: I) -> DashboardSummary
where
    I: IntoIterator<Item = &'a UserActivity>,
{
    let mut credits = 0_i64;
    let mut scanned = 0_i64;
    let mut queries = 0_i64;
    for activity in activities {
        credits = credits.saturating_add(parse_hundredths_or_zero(
            "creditsConsumed",
            activity.credits_consumed.as_deref(),
        ));
        scanned = scanned.saturating_add(parse_hundredths_or_zero(
            "dataScanned",
            activity.data_scanned.as_deref(),
        ));
        queries = queries.saturating_add(activity.queries_executed.unwrap_or(0));
    }

    DashboardSummary {
        total_users: users.len(),
        active_users: users.iter().filter(|user| user.is_active()).count(),
        total_credits: format_one_decimal(credits),
        total_queries: queries,
        total_data_scanned: format_one_decimal(scanned),
    }
}

/// Query builder for common operations
pub struct QueryBuilder<'a> {
    store: &'a SnowStore,
    thresholds: AdvisorThresholds,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(store: &'a SnowStore) -> Self {
        Self {
            store,
            thresholds: AdvisorThresholds::default(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: AdvisorThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Dashboard summary over every seeded user and activity.
    pub fn dashboard_summary(&self) -> DashboardSummary {
        let summary = summarize(
            self.store.snowflake_users(),
            self.store.all_user_activities(),
        );
        debug!(?summary, "Computed dashboard summary");
        summary
    }

    pub fn idle_warehouses(&self) -> &'a [WarehouseActivity] {
        self.store.warehouse_activity()
    }

    pub fn over_provisioning(&self) -> Vec<OverProvisioningAdvice> {
        self.store
            .warehouse_load()
            .iter()
            .map(|load| advise(load, &self.thresholds))
            .collect()
    }

    pub fn unused_warehouses(&self) -> Vec<UnusedWarehouse> {
        unused_warehouses(self.store.warehouse_credits())
    }
}
