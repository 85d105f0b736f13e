//! `sl_store` - In-memory storage layer for snowlens
//!
//! This crate provides:
//! - Typed records for users, activity, query cost, object usage, lineage,
//!   access, warehouse efficiency and RBAC
//! - Fixture seeding (built-in sample data or a JSON fixture file)
//! - Read-only accessors with optional exact-match filters
//! - Decimal-string conversion helpers

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub mod decimal;
pub mod fixtures;
pub mod schema;

pub use fixtures::Fixtures;
pub use schema::{
    DependencyType, ExpensiveQuery, GroupingType, HighRiskRole, IdleStatus, ImpactLevel,
    LineageDependency, ObjectUsage, OperationType, OrphanedRole, RiskLevel, RolePrivilege,
    SessionType, SnowflakeUser, User, UserActivity, UserAnalytics, UserObjectAccess,
    WarehouseActivity, WarehouseCredits, WarehouseLoad, WarehouseState,
};

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Fixture parse error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Filter for activity queries. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub user_id: Option<String>,
    pub session_type: Option<SessionType>,
}

impl ActivityFilter {
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            session_type: None,
        }
    }

    #[must_use]
    pub fn with_session_type(mut self, session_type: SessionType) -> Self {
        self.session_type = Some(session_type);
        self
    }

    #[must_use]
    pub fn matches(&self, activity: &UserActivity) -> bool {
        let user_ok = self
            .user_id
            .as_deref()
            .is_none_or(|id| activity.user_id == id);
        let session_ok = self
            .session_type
            .is_none_or(|kind| activity.session_type == Some(kind));
        user_ok && session_ok
    }
}

/// Record counts per collection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub snowflake_users: usize,
    pub user_analytics: usize,
    pub user_activities: usize,
    pub expensive_queries: usize,
    pub object_usage: usize,
    pub lineage_dependencies: usize,
    pub user_object_access: usize,
    pub warehouses: usize,
    pub orphaned_roles: usize,
}

/// Immutable in-memory store.
///
/// Built once from a [`Fixtures`] set; every accessor borrows from it and
/// returns records in seed order.
#[derive(Debug, Clone)]
pub struct SnowStore {
    data: Fixtures,
}

impl SnowStore {
    /// Seed the store from a fixture set.
    #[must_use]
    pub fn from_fixtures(data: Fixtures) -> Self {
        let store = Self { data };
        store.warn_duplicate_analytics();
        let stats = store.stats();
        info!(
            users = stats.snowflake_users,
            activities = stats.user_activities,
            queries = stats.expensive_queries,
            "Seeded in-memory store"
        );
        store
    }

    /// Seed the store from the built-in sample data.
    #[must_use]
    pub fn open_builtin() -> Self {
        Self::from_fixtures(Fixtures::builtin())
    }

    /// Seed the store from a JSON fixture file.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the fixture file cannot be loaded.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::from_fixtures(Fixtures::load(path)?))
    }

    /// Seed from `path` when given, otherwise from the built-in data.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if a fixture file was given and cannot be loaded.
    pub fn open_or_builtin(path: Option<&Path>) -> Result<Self, StoreError> {
        match path {
            Some(path) => Self::open(path),
            None => Ok(Self::open_builtin()),
        }
    }

    fn warn_duplicate_analytics(&self) {
        let mut seen = std::collections::HashSet::new();
        for row in &self.data.user_analytics {
            if !seen.insert(row.user_id.as_str()) {
                warn!(user_id = %row.user_id, "Duplicate analytics row; the first one wins");
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            snowflake_users: self.data.snowflake_users.len(),
            user_analytics: self.data.user_analytics.len(),
            user_activities: self.data.user_activities.len(),
            expensive_queries: self.data.expensive_queries.len(),
            object_usage: self.data.object_usage.len(),
            lineage_dependencies: self.data.lineage_dependencies.len(),
            user_object_access: self.data.user_object_access.len(),
            warehouses: self.data.warehouses.activity.len(),
            orphaned_roles: self.data.rbac.orphaned_roles.len(),
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    #[must_use]
    pub fn account(&self, id: &str) -> Option<&User> {
        self.data.accounts.iter().find(|user| user.id == id)
    }

    #[must_use]
    pub fn account_by_username(&self, username: &str) -> Option<&User> {
        self.data
            .accounts
            .iter()
            .find(|user| user.username == username)
    }

    // =========================================================================
    // Snowflake users
    // =========================================================================

    #[must_use]
    pub fn snowflake_users(&self) -> &[SnowflakeUser] {
        &self.data.snowflake_users
    }

    #[must_use]
    pub fn snowflake_user(&self, id: &str) -> Option<&SnowflakeUser> {
        self.data.snowflake_users.iter().find(|user| user.id == id)
    }

    #[must_use]
    pub fn snowflake_user_by_name(&self, user_name: &str) -> Option<&SnowflakeUser> {
        self.data
            .snowflake_users
            .iter()
            .find(|user| user.user_name == user_name)
    }

    // =========================================================================
    // Analytics and activity
    // =========================================================================

    #[must_use]
    pub fn user_analytics(&self, user_id: &str) -> Option<&UserAnalytics> {
        self.data
            .user_analytics
            .iter()
            .find(|row| row.user_id == user_id)
    }

    #[must_use]
    pub fn all_user_analytics(&self) -> &[UserAnalytics] {
        &self.data.user_analytics
    }

    #[must_use]
    pub fn all_user_activities(&self) -> &[UserActivity] {
        &self.data.user_activities
    }

    #[instrument(skip(self), level = "debug")]
    pub fn user_activities(&self, filter: &ActivityFilter) -> Vec<&UserActivity> {
        self.data
            .user_activities
            .iter()
            .filter(|activity| filter.matches(activity))
            .collect()
    }

    // =========================================================================
    // Cost and usage
    // =========================================================================

    #[instrument(skip(self), level = "debug")]
    pub fn expensive_queries(&self, grouping: Option<GroupingType>) -> Vec<&ExpensiveQuery> {
        self.data
            .expensive_queries
            .iter()
            .filter(|query| grouping.is_none_or(|g| query.grouping_type == g))
            .collect()
    }

    #[instrument(skip(self), level = "debug")]
    pub fn object_usage(&self, operation: Option<OperationType>) -> Vec<&ObjectUsage> {
        self.data
            .object_usage
            .iter()
            .filter(|row| operation.is_none_or(|op| row.operation_type == Some(op)))
            .collect()
    }

    // =========================================================================
    // Lineage and access
    // =========================================================================

    #[must_use]
    pub fn lineage_dependencies(&self, source_object: &str) -> Vec<&LineageDependency> {
        self.data
            .lineage_dependencies
            .iter()
            .filter(|dep| dep.source_object == source_object)
            .collect()
    }

    #[must_use]
    pub fn user_object_access(&self, object_name: &str) -> Vec<&UserObjectAccess> {
        self.data
            .user_object_access
            .iter()
            .filter(|row| row.object_name == object_name)
            .collect()
    }

    // =========================================================================
    // Warehouse efficiency
    // =========================================================================

    #[must_use]
    pub fn warehouse_activity(&self) -> &[WarehouseActivity] {
        &self.data.warehouses.activity
    }

    #[must_use]
    pub fn warehouse_load(&self) -> &[WarehouseLoad] {
        &self.data.warehouses.load
    }

    #[must_use]
    pub fn warehouse_credits(&self) -> &[WarehouseCredits] {
        &self.data.warehouses.credits
    }

    // =========================================================================
    // RBAC
    // =========================================================================

    #[must_use]
    pub fn orphaned_roles(&self) -> &[OrphanedRole] {
        &self.data.rbac.orphaned_roles
    }

    #[must_use]
    pub fn high_risk_roles(&self) -> &[HighRiskRole] {
        &self.data.rbac.high_risk_roles
    }

    #[must_use]
    pub fn high_risk_role(&self, role_name: &str) -> Option<&HighRiskRole> {
        self.data
            .rbac
            .high_risk_roles
            .iter()
            .find(|role| role.role_name == role_name)
    }
}

impl Default for SnowStore {
    fn default() -> Self {
        Self::open_builtin()
    }
}
