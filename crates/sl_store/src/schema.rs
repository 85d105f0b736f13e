//! Record types held by the store.
//!
//! Every record serializes with camelCase keys, which is the shape the
//! dashboard client reads. Decimal quantities stay decimal strings on the wire
//! (`"247.5"`); use [`crate::decimal`] to turn them into numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Filter tags
// =============================================================================

/// How an expensive-query row was aggregated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupingType {
    QueryHash,
    UserRole,
    UserQuery,
}

impl GroupingType {
    pub const ALL: [GroupingType; 3] = [
        GroupingType::QueryHash,
        GroupingType::UserRole,
        GroupingType::UserQuery,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingType::QueryHash => "query_hash",
            GroupingType::UserRole => "user_role",
            GroupingType::UserQuery => "user_query",
        }
    }
}

impl std::str::FromStr for GroupingType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "query_hash" => Ok(GroupingType::QueryHash),
            "user_role" => Ok(GroupingType::UserRole),
            "user_query" => Ok(GroupingType::UserQuery),
            other => Err(format!("unknown grouping type: {other}")),
        }
    }
}

/// DML operation recorded against an object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Read,
    Insert,
    Update,
    Delete,
}

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        OperationType::Read,
        OperationType::Insert,
        OperationType::Update,
        OperationType::Delete,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Read => "READ",
            OperationType::Insert => "INSERT",
            OperationType::Update => "UPDATE",
            OperationType::Delete => "DELETE",
        }
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "READ" => Ok(OperationType::Read),
            "INSERT" => Ok(OperationType::Insert),
            "UPDATE" => Ok(OperationType::Update),
            "DELETE" => Ok(OperationType::Delete),
            other => Err(format!("unknown operation type: {other}")),
        }
    }
}

/// Granularity of an activity row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Session,
    Daily,
}

impl SessionType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Session => "session",
            SessionType::Daily => "daily",
        }
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "session" => Ok(SessionType::Session),
            "daily" => Ok(SessionType::Daily),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}

/// Kind of lineage edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Logical,
    Fk,
    External,
}

/// Qualitative impact of a user's access to an object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

/// Risk rating attached to a principal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

// =============================================================================
// Core entities
// =============================================================================

/// Generic application account. Not used by the dashboard views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

/// A warehouse-platform principal, human or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeUser {
    pub id: String,
    pub user_name: String,
    pub user_owner: Option<String>,
    pub last_successful_login: Option<DateTime<Utc>>,
    pub status: String,
    pub authentication_method: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub created_on: DateTime<Utc>,
    #[serde(rename = "isNHI", default)]
    pub is_nhi: bool,
    /// Only set for non-human identities.
    pub token_type: Option<String>,
    /// Only set for non-human identities.
    pub human_owner: Option<String>,
}

impl SnowflakeUser {
    pub const STATUS_ACTIVE: &'static str = "Active";

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Self::STATUS_ACTIVE
    }
}

/// Per-user usage rollup. At most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub total_queries: i64,
    pub avg_query_duration: Option<String>,
    pub most_used_query_type: Option<String>,
    #[serde(default)]
    pub distinct_databases: i64,
    pub frequent_tables: Option<String>,
    pub credits_used: Option<String>,
    pub warehouse_usage: Option<String>,
    #[serde(default)]
    pub unique_roles: i64,
    #[serde(default)]
    pub unique_privileges: i64,
    pub data_scanned: Option<String>,
}

/// One login session (or daily rollup) for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub id: String,
    pub user_id: String,
    pub login_time: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub roles: Option<String>,
    pub objects_accessed: Option<String>,
    pub credits_consumed: Option<String>,
    pub queries_executed: Option<i64>,
    pub data_scanned: Option<String>,
    pub session_type: Option<SessionType>,
}

/// A costly query aggregate, tagged with how it was grouped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpensiveQuery {
    pub id: String,
    pub query_hash: Option<String>,
    #[serde(default)]
    pub sample_query_text: String,
    pub users: Option<String>,
    pub roles: Option<String>,
    pub warehouses: Option<String>,
    #[serde(default)]
    pub total_executions: i64,
    pub total_credits_used: Option<String>,
    pub total_mb_scanned: Option<String>,
    pub total_runtime_sec: Option<String>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub grouping_type: GroupingType,
    pub user_name: Option<String>,
    pub role_name: Option<String>,
}

/// Credit consumption of one object for one operation type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectUsage {
    pub id: String,
    pub object_name: String,
    pub object_type: String,
    pub operation_type: Option<OperationType>,
    pub credits_consumed: Option<String>,
    pub unique_users: Option<String>,
    #[serde(default)]
    pub access_count: i64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub data_scanned: Option<String>,
}

/// Directed edge: `dependent_object` depends on `source_object`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineageDependency {
    pub id: String,
    pub source_object: String,
    pub dependent_object: String,
    pub dependency_type: DependencyType,
    pub constraint_name: Option<String>,
    pub external_system: Option<String>,
    #[serde(default = "default_lineage_status")]
    pub status: String,
}

fn default_lineage_status() -> String {
    "active".to_string()
}

/// Access log row for a user touching an object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserObjectAccess {
    pub id: String,
    pub object_name: String,
    pub user_name: String,
    pub role_name: Option<String>,
    pub query_type: Option<String>,
    #[serde(default)]
    pub access_count: i64,
    pub credits_used: Option<String>,
    pub last_access: Option<DateTime<Utc>>,
    pub impact_level: Option<ImpactLevel>,
}

// =============================================================================
// Warehouse efficiency
// =============================================================================

/// Suspend/resume state inferred from warehouse events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarehouseState {
    PotentiallySuspended,
    PotentiallyRunning,
}

/// Idle classification shown by the idle time monitor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IdleStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "IDLE (>30m)")]
    Idle,
    #[serde(rename = "NO_QUERIES")]
    NoQueries,
}

/// Last-seen events for a warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseActivity {
    pub name: String,
    pub last_query: Option<DateTime<Utc>>,
    pub last_resume: Option<DateTime<Utc>>,
    pub last_suspend: Option<DateTime<Utc>>,
    pub state: WarehouseState,
    pub status: IdleStatus,
}

/// Utilization figures for a warehouse over the reporting window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseLoad {
    pub name: String,
    pub current_size: String,
    /// Fraction of time with running queries, 0..=1.
    pub avg_running_ratio: f64,
    /// Fraction of time with queued queries, 0..=1.
    pub avg_queued_load: f64,
}

/// Credit spend and query volume for a warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseCredits {
    pub name: String,
    pub compute_credits_used: f64,
    pub query_count: i64,
}

// =============================================================================
// RBAC
// =============================================================================

/// A role with no grants to users or other roles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedRole {
    pub role_name: String,
    pub role_type: String,
    pub creation_date: DateTime<Utc>,
}

/// A privilege held by a role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RolePrivilege {
    pub privilege: String,
    pub granted_on: String,
    pub object_name: String,
    pub grant_option: bool,
    pub created_on: DateTime<Utc>,
}

/// A system role considered high risk, with whatever grants were captured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighRiskRole {
    pub role_name: String,
    #[serde(default)]
    pub privileges: Vec<RolePrivilege>,
}
