#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Initialize tracing once for integration tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(filter)
            .init();
    });
}

/// Generate a unique temporary file path for a test.
pub fn temp_path(test_name: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("sl_{test_name}_{nanos}.{extension}"))
}

/// Write `contents` to a test-scoped file and return its path.
pub fn write_temp(test_name: &str, extension: &str, contents: &str) -> PathBuf {
    let path = temp_path(test_name, extension);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Build a default config pointing at a test-scoped fixture file.
pub fn temp_config(test_name: &str) -> sl_config::SlConfig {
    let mut config = sl_config::SlConfig::default();
    config.global.fixtures_path = Some(temp_path(test_name, "json"));
    config
}
