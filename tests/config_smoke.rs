mod common;

use common::{init_tracing, temp_config, write_temp};
use sl_config::SlConfig;
use sl_store::SnowStore;

#[test]
fn test_temp_config_defaults() {
    init_tracing();
    let config = temp_config("config_smoke");
    assert!(config.web.port > 0);
    assert!(config.global.fixtures_path.is_some());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_file_points_store_at_fixtures() {
    init_tracing();
    let fixtures = write_temp(
        "fixture_users",
        "json",
        r#"{
            "snowflakeUsers": [{
                "id": "sfu-only",
                "userName": "ONLY_USER",
                "userOwner": null,
                "lastSuccessfulLogin": null,
                "status": "Active",
                "authenticationMethod": null,
                "riskLevel": null,
                "createdOn": "2024-01-01T00:00:00Z",
                "isNHI": true,
                "tokenType": "OAuth",
                "humanOwner": "AMITP"
            }]
        }"#,
    );
    let config_file = write_temp(
        "fixture_config",
        "toml",
        &format!(
            "[global]\nfixtures_path = {:?}\n\n[web]\nport = 5055\n",
            fixtures.display().to_string()
        ),
    );

    let config = SlConfig::load(&config_file).unwrap();
    assert_eq!(config.web.port, 5055);

    let store = SnowStore::open_or_builtin(config.global.fixtures_path.as_deref()).unwrap();
    assert_eq!(store.snowflake_users().len(), 1);
    assert!(store.snowflake_users()[0].is_nhi);
    assert!(store.expensive_queries(None).is_empty());

    std::fs::remove_file(&fixtures).ok();
    std::fs::remove_file(&config_file).ok();
}

#[test]
fn test_generated_config_loads() {
    init_tracing();
    let path = write_temp("generated", "toml", &SlConfig::generate_default_toml());
    let config = SlConfig::load(&path).unwrap();
    assert_eq!(config, SlConfig::default());
    std::fs::remove_file(&path).ok();
}
