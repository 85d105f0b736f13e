//! Fixture sets the store is seeded from.
//!
//! [`Fixtures::builtin`] is the sample dataset compiled into the binary.
//! [`Fixtures::load`] reads the same shape from a JSON file, which lets a
//! deployment swap in its own sample data without a rebuild.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::StoreError;
use crate::schema::{
    DependencyType, ExpensiveQuery, GroupingType, HighRiskRole, IdleStatus, ImpactLevel,
    LineageDependency, ObjectUsage, OperationType, OrphanedRole, RiskLevel, RolePrivilege,
    SessionType, SnowflakeUser, User, UserActivity, UserAnalytics, UserObjectAccess,
    WarehouseActivity, WarehouseCredits, WarehouseLoad, WarehouseState,
};

/// Warehouse efficiency inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WarehouseFixtures {
    pub activity: Vec<WarehouseActivity>,
    pub load: Vec<WarehouseLoad>,
    pub credits: Vec<WarehouseCredits>,
}

/// RBAC inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RbacFixtures {
    pub orphaned_roles: Vec<OrphanedRole>,
    pub high_risk_roles: Vec<HighRiskRole>,
}

/// Every collection the store holds, in seed order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Fixtures {
    pub accounts: Vec<User>,
    pub snowflake_users: Vec<SnowflakeUser>,
    pub user_analytics: Vec<UserAnalytics>,
    pub user_activities: Vec<UserActivity>,
    pub expensive_queries: Vec<ExpensiveQuery>,
    pub object_usage: Vec<ObjectUsage>,
    pub lineage_dependencies: Vec<LineageDependency>,
    pub user_object_access: Vec<UserObjectAccess>,
    pub warehouses: WarehouseFixtures,
    pub rbac: RbacFixtures,
}

impl Fixtures {
    /// Load a fixture set from a JSON file.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the file cannot be read or does not match
    /// the fixture schema.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let fixtures: Fixtures = serde_json::from_str(&content)?;
        info!(
            users = fixtures.snowflake_users.len(),
            activities = fixtures.user_activities.len(),
            "Loaded fixtures from file"
        );
        Ok(fixtures)
    }

    /// The compiled-in sample dataset.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            accounts: Vec::new(),
            snowflake_users: builtin_snowflake_users(),
            user_analytics: builtin_user_analytics(),
            user_activities: builtin_user_activities(),
            expensive_queries: builtin_expensive_queries(),
            object_usage: builtin_object_usage(),
            lineage_dependencies: builtin_lineage_dependencies(),
            user_object_access: builtin_user_object_access(),
            warehouses: builtin_warehouses(),
            rbac: builtin_rbac(),
        }
    }
}

/// Stable identifiers of the built-in principals.
pub mod ids {
    pub const AMITP: &str = "sfu-amitp";
    pub const API_USER: &str = "sfu-api-user";
    pub const DEV_USER: &str = "sfu-dev-user";
    pub const VMAMIDI: &str = "sfu-vmamidi";
    pub const SB_INTEGRATION: &str = "sfu-sb-integration";
    pub const DEV_TESTING: &str = "sfu-dev-testing";
    pub const APP_INTEGRATION: &str = "sfu-app-integration";
}

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .unwrap_or_default()
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

struct Principal<'a> {
    id: &'a str,
    name: &'a str,
    owner: &'a str,
    last_login: DateTime<Utc>,
    status: &'a str,
    auth: &'a str,
    risk: RiskLevel,
}

fn human(p: Principal<'_>) -> SnowflakeUser {
    SnowflakeUser {
        id: p.id.to_string(),
        user_name: p.name.to_string(),
        user_owner: text(p.owner),
        last_successful_login: Some(p.last_login),
        status: p.status.to_string(),
        authentication_method: text(p.auth),
        risk_level: Some(p.risk),
        created_on: at(2024, 1, 1, 0, 0, 0),
        is_nhi: false,
        token_type: None,
        human_owner: None,
    }
}

fn non_human(p: Principal<'_>, token_type: &str) -> SnowflakeUser {
    SnowflakeUser {
        is_nhi: true,
        token_type: text(token_type),
        human_owner: text(p.owner),
        ..human(p)
    }
}

fn builtin_snowflake_users() -> Vec<SnowflakeUser> {
    vec![
        human(Principal {
            id: ids::AMITP,
            name: "AMITP",
            owner: "ADMIN",
            last_login: at(2024, 1, 15, 9, 32, 0),
            status: "Active",
            auth: "SSO",
            risk: RiskLevel::Low,
        }),
        human(Principal {
            id: ids::API_USER,
            name: "API_USER",
            owner: "SYSTEM",
            last_login: at(2024, 1, 15, 11, 45, 0),
            status: "Active",
            auth: "API_KEY",
            risk: RiskLevel::Medium,
        }),
        human(Principal {
            id: ids::DEV_USER,
            name: "DEV_USER",
            owner: "DEV_ADMIN",
            last_login: at(2024, 1, 14, 16, 22, 0),
            status: "Idle",
            auth: "PASSWORD",
            risk: RiskLevel::Low,
        }),
        human(Principal {
            id: ids::VMAMIDI,
            name: "VMAMIDI",
            owner: "ADMIN",
            last_login: at(2024, 1, 15, 8, 15, 0),
            status: "Active",
            auth: "SSO",
            risk: RiskLevel::Low,
        }),
        non_human(
            Principal {
                id: ids::SB_INTEGRATION,
                name: "SB_INTEGRATION",
                owner: "AMITP",
                last_login: at(2024, 1, 15, 10, 0, 0),
                status: "Active",
                auth: "OAUTH",
                risk: RiskLevel::Medium,
            },
            "OAUTH_ACCESS_TOKEN",
        ),
        non_human(
            Principal {
                id: ids::DEV_TESTING,
                name: "DEV_TESTING",
                owner: "DEV_USER",
                last_login: at(2024, 1, 15, 9, 30, 0),
                status: "Active",
                auth: "PROGRAMMATIC",
                risk: RiskLevel::High,
            },
            "PROGRAMMATIC_ACCESS_TOKEN",
        ),
        non_human(
            Principal {
                id: ids::APP_INTEGRATION,
                name: "APP_INTEGRATION",
                owner: "VMAMIDI",
                last_login: at(2024, 1, 15, 7, 45, 0),
                status: "Active",
                auth: "OAUTH",
                risk: RiskLevel::Medium,
            },
            "OAUTH_ACCESS_TOKEN",
        ),
    ]
}

fn builtin_user_analytics() -> Vec<UserAnalytics> {
    vec![
        UserAnalytics {
            id: "ua-amitp".to_string(),
            user_id: ids::AMITP.to_string(),
            total_queries: 3247,
            avg_query_duration: text("2.4"),
            most_used_query_type: text("SELECT"),
            distinct_databases: 7,
            frequent_tables: text("USERS"),
            credits_used: text("847.5"),
            warehouse_usage: text("COMPUTE_WH"),
            unique_roles: 4,
            unique_privileges: 15,
            data_scanned: text("234.8"),
        },
        UserAnalytics {
            id: "ua-sb-integration".to_string(),
            user_id: ids::SB_INTEGRATION.to_string(),
            total_queries: 1847,
            avg_query_duration: text("1.8"),
            most_used_query_type: text("INSERT"),
            distinct_databases: 3,
            frequent_tables: text("STAGING"),
            credits_used: text("456.2"),
            warehouse_usage: text("ETL_WH"),
            unique_roles: 2,
            unique_privileges: 8,
            data_scanned: text("89.3"),
        },
    ]
}

struct Session<'a> {
    id: &'a str,
    user_id: &'a str,
    login_time: DateTime<Utc>,
    ip: &'a str,
    roles: &'a str,
    objects: &'a str,
    credits: &'a str,
    queries: i64,
    scanned: &'a str,
}

fn session(s: Session<'_>) -> UserActivity {
    UserActivity {
        id: s.id.to_string(),
        user_id: s.user_id.to_string(),
        login_time: s.login_time,
        ip_address: text(s.ip),
        roles: text(s.roles),
        objects_accessed: text(s.objects),
        credits_consumed: text(s.credits),
        queries_executed: Some(s.queries),
        data_scanned: text(s.scanned),
        session_type: Some(SessionType::Session),
    }
}

fn builtin_user_activities() -> Vec<UserActivity> {
    vec![
        session(Session {
            id: "act-0001",
            user_id: ids::AMITP,
            login_time: at(2024, 1, 15, 9, 32, 15),
            ip: "192.168.1.105",
            roles: "ADMIN, ANALYST",
            objects: "USERS, ORDERS, INVENTORY",
            credits: "247.5",
            queries: 1832,
            scanned: "45.2",
        }),
        session(Session {
            id: "act-0002",
            user_id: ids::API_USER,
            login_time: at(2024, 1, 15, 11, 45, 22),
            ip: "10.0.0.24",
            roles: "API_ROLE",
            objects: "LOGS, METRICS",
            credits: "156.8",
            queries: 956,
            scanned: "28.7",
        }),
        session(Session {
            id: "act-0003",
            user_id: ids::SB_INTEGRATION,
            login_time: at(2024, 1, 15, 10, 0, 0),
            ip: "10.0.1.45",
            roles: "ETL_ROLE, INTEGRATION",
            objects: "STAGING, RAW_DATA, PROCESSED",
            credits: "298.7",
            queries: 1456,
            scanned: "67.8",
        }),
        session(Session {
            id: "act-0004",
            user_id: ids::DEV_TESTING,
            login_time: at(2024, 1, 15, 9, 30, 0),
            ip: "10.0.2.33",
            roles: "DEV_ROLE",
            objects: "TEST_DATA, SANDBOX",
            credits: "89.4",
            queries: 567,
            scanned: "12.3",
        }),
    ]
}

struct QueryAggregate<'a> {
    id: &'a str,
    executions: i64,
    credits: &'a str,
    mb_scanned: &'a str,
    runtime_sec: &'a str,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    grouping: GroupingType,
}

impl QueryAggregate<'_> {
    fn into_query(self) -> ExpensiveQuery {
        ExpensiveQuery {
            id: self.id.to_string(),
            query_hash: None,
            sample_query_text: String::new(),
            users: text(""),
            roles: text(""),
            warehouses: text(""),
            total_executions: self.executions,
            total_credits_used: text(self.credits),
            total_mb_scanned: text(self.mb_scanned),
            total_runtime_sec: text(self.runtime_sec),
            first_seen: Some(self.first_seen),
            last_seen: Some(self.last_seen),
            grouping_type: self.grouping,
            user_name: None,
            role_name: None,
        }
    }
}

fn builtin_expensive_queries() -> Vec<ExpensiveQuery> {
    vec![
        ExpensiveQuery {
            query_hash: text("abc123def456"),
            sample_query_text: "SELECT * FROM large_table WHERE complex_join...".to_string(),
            users: text("AMITP, API_USER"),
            roles: text("ADMIN, ANALYST"),
            warehouses: text("COMPUTE_WH_L"),
            ..QueryAggregate {
                id: "eq-0001",
                executions: 847,
                credits: "2456.8",
                mb_scanned: "156700",
                runtime_sec: "324.2",
                first_seen: at(2024, 1, 8, 0, 0, 0),
                last_seen: at(2024, 1, 15, 0, 0, 0),
                grouping: GroupingType::QueryHash,
            }
            .into_query()
        },
        ExpensiveQuery {
            query_hash: text("def456ghi789"),
            sample_query_text: "CREATE TABLE temp_analytics AS SELECT...".to_string(),
            users: text("DEV_USER"),
            roles: text("DEVELOPER"),
            warehouses: text("DEV_WH"),
            ..QueryAggregate {
                id: "eq-0002",
                executions: 234,
                credits: "1892.5",
                mb_scanned: "98300",
                runtime_sec: "245.8",
                first_seen: at(2024, 1, 9, 0, 0, 0),
                last_seen: at(2024, 1, 14, 0, 0, 0),
                grouping: GroupingType::QueryHash,
            }
            .into_query()
        },
        ExpensiveQuery {
            user_name: text("AMITP"),
            role_name: text("ADMIN"),
            ..QueryAggregate {
                id: "eq-0003",
                executions: 3247,
                credits: "4892.7",
                mb_scanned: "234800",
                runtime_sec: "1245.8",
                first_seen: at(2024, 1, 8, 0, 0, 0),
                last_seen: at(2024, 1, 15, 0, 0, 0),
                grouping: GroupingType::UserRole,
            }
            .into_query()
        },
        ExpensiveQuery {
            user_name: text("SB_INTEGRATION"),
            role_name: text("ETL_ROLE"),
            ..QueryAggregate {
                id: "eq-0004",
                executions: 1847,
                credits: "2134.6",
                mb_scanned: "89300",
                runtime_sec: "567.3",
                first_seen: at(2024, 1, 9, 0, 0, 0),
                last_seen: at(2024, 1, 15, 0, 0, 0),
                grouping: GroupingType::UserRole,
            }
            .into_query()
        },
        ExpensiveQuery {
            query_hash: text("ghi789jkl012"),
            sample_query_text: "INSERT INTO staging_table SELECT * FROM raw_data WHERE..."
                .to_string(),
            users: text("SB_INTEGRATION"),
            roles: text("ETL_ROLE"),
            warehouses: text("ETL_WH"),
            user_name: text("SB_INTEGRATION"),
            role_name: text("ETL_ROLE"),
            ..QueryAggregate {
                id: "eq-0005",
                executions: 1456,
                credits: "1678.9",
                mb_scanned: "67800",
                runtime_sec: "189.7",
                first_seen: at(2024, 1, 10, 0, 0, 0),
                last_seen: at(2024, 1, 15, 0, 0, 0),
                grouping: GroupingType::UserQuery,
            }
            .into_query()
        },
        ExpensiveQuery {
            query_hash: text("mno345pqr678"),
            sample_query_text: "UPDATE analytics_cache SET last_updated = CURRENT_TIMESTAMP..."
                .to_string(),
            users: text("VMAMIDI"),
            roles: text("ANALYST"),
            warehouses: text("COMPUTE_WH"),
            user_name: text("VMAMIDI"),
            role_name: text("ANALYST"),
            ..QueryAggregate {
                id: "eq-0006",
                executions: 234,
                credits: "567.8",
                mb_scanned: "23400",
                runtime_sec: "78.9",
                first_seen: at(2024, 1, 11, 0, 0, 0),
                last_seen: at(2024, 1, 15, 0, 0, 0),
                grouping: GroupingType::UserQuery,
            }
            .into_query()
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn usage(
    id: &str,
    object_name: &str,
    object_type: &str,
    operation: OperationType,
    credits: &str,
    users: &str,
    access_count: i64,
    last_accessed: DateTime<Utc>,
    scanned: &str,
) -> ObjectUsage {
    ObjectUsage {
        id: id.to_string(),
        object_name: object_name.to_string(),
        object_type: object_type.to_string(),
        operation_type: Some(operation),
        credits_consumed: text(credits),
        unique_users: text(users),
        access_count,
        last_accessed: Some(last_accessed),
        data_scanned: text(scanned),
    }
}

fn builtin_object_usage() -> Vec<ObjectUsage> {
    vec![
        usage(
            "ou-0001",
            "USERS_FACT_TABLE",
            "Table",
            OperationType::Read,
            "1456.8",
            "AMITP, VMAMIDI, DEV_USER",
            2847,
            at(2024, 1, 15, 14, 32, 0),
            "89.4",
        ),
        usage(
            "ou-0002",
            "ORDERS_ANALYTICS_VIEW",
            "View",
            OperationType::Read,
            "987.3",
            "AMITP, VMAMIDI",
            1543,
            at(2024, 1, 15, 13, 45, 0),
            "67.2",
        ),
        usage(
            "ou-0003",
            "STAGING_TABLE",
            "Table",
            OperationType::Insert,
            "2134.7",
            "VMAMIDI, DEV_USER",
            1234,
            at(2024, 1, 15, 15, 22, 0),
            "156.7",
        ),
        usage(
            "ou-0004",
            "ETL_PROCESSING_LOG",
            "Table",
            OperationType::Insert,
            "567.8",
            "SB_INTEGRATION, DEV_TESTING",
            2345,
            at(2024, 1, 15, 12, 15, 0),
            "78.9",
        ),
        usage(
            "ou-0005",
            "CUSTOMER_METRICS",
            "View",
            OperationType::Read,
            "1234.5",
            "AMITP, API_USER, VMAMIDI",
            1876,
            at(2024, 1, 15, 11, 30, 0),
            "98.3",
        ),
        usage(
            "ou-0006",
            "TEMP_CALCULATIONS",
            "Table",
            OperationType::Update,
            "345.2",
            "APP_INTEGRATION",
            456,
            at(2024, 1, 15, 10, 45, 0),
            "34.6",
        ),
        usage(
            "ou-0007",
            "AUDIT_TRAIL",
            "Table",
            OperationType::Delete,
            "123.4",
            "DEV_USER",
            234,
            at(2024, 1, 15, 9, 0, 0),
            "15.7",
        ),
    ]
}

fn builtin_lineage_dependencies() -> Vec<LineageDependency> {
    let edge = |id: &str, dependent: &str, kind: DependencyType| LineageDependency {
        id: id.to_string(),
        source_object: "USERS_FACT_TABLE".to_string(),
        dependent_object: dependent.to_string(),
        dependency_type: kind,
        constraint_name: None,
        external_system: None,
        status: "active".to_string(),
    };

    vec![
        edge("ld-0001", "USER_ANALYTICS_VIEW", DependencyType::Logical),
        LineageDependency {
            constraint_name: text("fk_user_orders_userid"),
            ..edge("ld-0002", "USER_ORDERS", DependencyType::Fk)
        },
        LineageDependency {
            external_system: text("Tableau"),
            ..edge(
                "ld-0003",
                "Tableau User Analytics Dashboard",
                DependencyType::External,
            )
        },
    ]
}

fn builtin_user_object_access() -> Vec<UserObjectAccess> {
    let access = |id: &str,
                  user: &str,
                  role: &str,
                  count: i64,
                  credits: &str,
                  last: DateTime<Utc>,
                  impact: ImpactLevel| UserObjectAccess {
        id: id.to_string(),
        object_name: "USERS_FACT_TABLE".to_string(),
        user_name: user.to_string(),
        role_name: text(role),
        query_type: text("SELECT"),
        access_count: count,
        credits_used: text(credits),
        last_access: Some(last),
        impact_level: Some(impact),
    };

    vec![
        access(
            "uoa-0001",
            "AMITP",
            "ADMIN",
            2847,
            "1456.8",
            at(2024, 1, 15, 14, 32, 0),
            ImpactLevel::High,
        ),
        access(
            "uoa-0002",
            "VMAMIDI",
            "ANALYST",
            1234,
            "678.2",
            at(2024, 1, 15, 13, 15, 0),
            ImpactLevel::Medium,
        ),
        access(
            "uoa-0003",
            "API_USER",
            "API_ROLE",
            892,
            "445.7",
            at(2024, 1, 15, 11, 45, 0),
            ImpactLevel::Low,
        ),
    ]
}

fn builtin_warehouses() -> WarehouseFixtures {
    let activity = |name: &str,
                    last_query: Option<DateTime<Utc>>,
                    last_resume: Option<DateTime<Utc>>,
                    last_suspend: Option<DateTime<Utc>>,
                    state: WarehouseState,
                    status: IdleStatus| WarehouseActivity {
        name: name.to_string(),
        last_query,
        last_resume,
        last_suspend,
        state,
        status,
    };
    let load = |name: &str, size: &str, running: f64, queued: f64| WarehouseLoad {
        name: name.to_string(),
        current_size: size.to_string(),
        avg_running_ratio: running,
        avg_queued_load: queued,
    };
    let credits = |name: &str, used: f64, queries: i64| WarehouseCredits {
        name: name.to_string(),
        compute_credits_used: used,
        query_count: queries,
    };

    WarehouseFixtures {
        activity: vec![
            activity(
                "WH_ANALYTICS",
                Some(at(2025, 8, 9, 9, 5, 0)),
                Some(at(2025, 8, 9, 9, 0, 0)),
                Some(at(2025, 8, 9, 9, 30, 0)),
                WarehouseState::PotentiallySuspended,
                IdleStatus::Active,
            ),
            activity(
                "WH_ETL",
                Some(at(2025, 8, 9, 7, 0, 0)),
                Some(at(2025, 8, 9, 6, 55, 0)),
                None,
                WarehouseState::PotentiallyRunning,
                IdleStatus::Idle,
            ),
            activity(
                "WH_STAGING",
                None,
                Some(at(2025, 8, 1, 10, 0, 0)),
                Some(at(2025, 8, 1, 10, 30, 0)),
                WarehouseState::PotentiallySuspended,
                IdleStatus::NoQueries,
            ),
            activity(
                "WH_ADHOC",
                Some(at(2025, 8, 9, 8, 0, 0)),
                Some(at(2025, 8, 9, 7, 55, 0)),
                Some(at(2025, 8, 9, 8, 30, 0)),
                WarehouseState::PotentiallySuspended,
                IdleStatus::Idle,
            ),
            activity(
                "WH_DEV",
                Some(at(2025, 8, 9, 9, 25, 0)),
                Some(at(2025, 8, 9, 9, 20, 0)),
                None,
                WarehouseState::PotentiallyRunning,
                IdleStatus::Active,
            ),
        ],
        load: vec![
            load("WH_STAGING", "X-Small", 0.03, 0.0),
            load("WH_ETL", "Medium", 0.12, 0.02),
            load("WH_ADHOC", "Small", 0.2, 0.18),
            load("WH_ANALYTICS", "Large", 0.45, 0.05),
            load("WH_DEV", "UNKNOWN", 0.28, 0.01),
        ],
        credits: vec![
            credits("WH_STAGING", 150.25, 300),
            credits("WH_ANALYTICS", 750.0, 5000),
            credits("WH_ETL", 210.1, 3000),
            credits("WH_ADHOC", 90.0, 1800),
            credits("WH_DEV", 10.0, 1000),
            credits("WH_UNUSED", 5.0, 0),
        ],
    }
}

fn builtin_rbac() -> RbacFixtures {
    let orphan = |name: &str, role_type: &str, created: DateTime<Utc>| OrphanedRole {
        role_name: name.to_string(),
        role_type: role_type.to_string(),
        creation_date: created,
    };
    let instance_created = at(2025, 7, 28, 12, 38, 0);
    let granted = at(2025, 7, 28, 12, 32, 0);
    let account_privilege = |privilege: &str| RolePrivilege {
        privilege: privilege.to_string(),
        granted_on: "ACCOUNT".to_string(),
        object_name: "ZM08212".to_string(),
        grant_option: true,
        created_on: granted,
    };
    let role = |name: &str, privileges: Vec<RolePrivilege>| HighRiskRole {
        role_name: name.to_string(),
        privileges,
    };

    RbacFixtures {
        orphaned_roles: vec![
            orphan("ADMIN", "INSTANCE ROLE", instance_created),
            orphan("DEVELOPER", "INSTANCE ROLE", instance_created),
            orphan("ENGINEER", "INSTANCE ROLE", instance_created),
            orphan("READER", "INSTANCE ROLE", instance_created),
            orphan("VIEWER", "INSTANCE ROLE", instance_created),
            orphan("USER", "INSTANCE ROLE", instance_created),
            orphan("SAMPLE ROLE 1", "ROLE", at(2025, 8, 3, 13, 34, 0)),
            orphan("TEST ROLE 1", "ROLE", at(2025, 8, 3, 23, 18, 0)),
        ],
        high_risk_roles: vec![
            role("ACCOUNTADMIN", Vec::new()),
            role(
                "ORGADMIN",
                vec![
                    account_privilege("MANAGE BILLING"),
                    account_privilege("CREATE LISTING"),
                    account_privilege("MANAGE LISTING AUTO FULFILLMENT"),
                    account_privilege("PURCHASE DATA EXCHANGE LISTING"),
                    account_privilege("MANAGE ORGANIZATION SUPPORT CASES"),
                    account_privilege("APPLY TAG"),
                ],
            ),
            role("SECURITYADMIN", Vec::new()),
            role("SYSADMIN", Vec::new()),
            role("USERADMIN", Vec::new()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    #[test]
    fn test_builtin_user_mix() {
        let fixtures = Fixtures::builtin();
        assert_eq!(fixtures.snowflake_users.len(), 7);
        let nhi = fixtures.snowflake_users.iter().filter(|u| u.is_nhi).count();
        assert_eq!(nhi, 3);
        let active = fixtures
            .snowflake_users
            .iter()
            .filter(|u| u.is_active())
            .count();
        assert_eq!(active, 6);
    }

    #[test]
    fn test_builtin_ids_unique() {
        let fixtures = Fixtures::builtin();
        let ids: HashSet<_> = fixtures.snowflake_users.iter().map(|u| &u.id).collect();
        assert_eq!(ids.len(), fixtures.snowflake_users.len());
        let ids: HashSet<_> = fixtures.user_activities.iter().map(|a| &a.id).collect();
        assert_eq!(ids.len(), fixtures.user_activities.len());
    }

    #[test]
    fn test_builtin_foreign_keys_resolve() {
        let fixtures = Fixtures::builtin();
        let ids: HashSet<_> = fixtures
            .snowflake_users
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        for activity in &fixtures.user_activities {
            assert!(ids.contains(activity.user_id.as_str()), "{}", activity.id);
        }
        for analytics in &fixtures.user_analytics {
            assert!(ids.contains(analytics.user_id.as_str()), "{}", analytics.id);
        }
    }

    #[test]
    fn test_builtin_grouping_mix() {
        let fixtures = Fixtures::builtin();
        for grouping in GroupingType::ALL {
            let count = fixtures
                .expensive_queries
                .iter()
                .filter(|q| q.grouping_type == grouping)
                .count();
            assert_eq!(count, 2, "{}", grouping.as_str());
        }
    }

    #[test]
    fn test_builtin_timestamps_are_real() {
        let fixtures = Fixtures::builtin();
        for user in &fixtures.snowflake_users {
            assert_eq!(user.created_on, at(2024, 1, 1, 0, 0, 0));
            assert_ne!(user.created_on, DateTime::<Utc>::default());
        }
    }

    #[test]
    fn test_load_from_json_file() {
        let fixtures = Fixtures::builtin();
        let json = serde_json::to_string_pretty(&fixtures).unwrap();

        let path = std::env::temp_dir().join(format!(
            "sl_fixtures_{}_{}.json",
            std::process::id(),
            line!()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = Fixtures::load(&path).unwrap();
        assert_eq!(loaded.snowflake_users, fixtures.snowflake_users);
        assert_eq!(loaded.expensive_queries, fixtures.expensive_queries);
        assert_eq!(loaded.warehouses.activity, fixtures.warehouses.activity);
        assert_eq!(loaded.rbac, fixtures.rbac);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_partial_file_defaults_missing_sections() {
        let path = std::env::temp_dir().join(format!(
            "sl_fixtures_{}_{}.json",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, r#"{"lineageDependencies": []}"#).unwrap();

        let loaded = Fixtures::load(&path).unwrap();
        assert!(loaded.snowflake_users.is_empty());
        assert!(loaded.rbac.orphaned_roles.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let result = Fixtures::load(Path::new("/nonexistent/sl_fixtures.json"));
        assert!(matches!(result, Err(StoreError::IoError(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = std::env::temp_dir().join(format!(
            "sl_fixtures_{}_{}.json",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, "{ not json").unwrap();

        let result = Fixtures::load(&path);
        assert!(matches!(result, Err(StoreError::SerializationError(_))));

        std::fs::remove_file(&path).ok();
    }
}
