// tests/config_load.rs
//
// Config layering: file path from env, env overrides, and the API key coming
// only from RAPIDAPI_KEY. Tests mutate process env, so they run serially.

use std::{env, fs};

use price_scout::ScoutConfig;
use serial_test::serial;

const TOUCHED: &[&str] = &[
    "PRICE_SCOUT_CONFIG",
    "PRICE_SCOUT_BASE_URL",
    "PRICE_SCOUT_AFFILIATE_ID",
    "PRICE_SCOUT_COUNTRY_CODE",
    "PRICE_SCOUT_TIMEOUT_SECS",
    "PRICE_SCOUT_BIND",
    "RAPIDAPI_KEY",
];

fn clear_env() {
    for k in TOUCHED {
        env::remove_var(k);
    }
}

#[serial]
#[test]
fn file_then_env_overrides() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("scout.toml");
    fs::write(
        &p,
        r#"
        affiliate_id = "FROM-FILE"
        country_code = "AU"
        bind_addr = "127.0.0.1:9000"

        [schema]
        link_field = "link"
        "#,
    )
    .unwrap();

    env::set_var("PRICE_SCOUT_CONFIG", p.display().to_string());
    env::set_var("PRICE_SCOUT_AFFILIATE_ID", "FROM-ENV");
    env::set_var("RAPIDAPI_KEY", "secret");

    let cfg = ScoutConfig::load().expect("load");
    assert_eq!(cfg.affiliate_id, "FROM-ENV", "env wins over file");
    assert_eq!(cfg.country_code, "AU");
    assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
    assert_eq!(cfg.schema.link_field, "link");
    assert_eq!(cfg.api_key.as_deref(), Some("secret"));

    clear_env();
}

#[serial]
#[test]
fn config_env_pointing_nowhere_is_an_error() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    env::set_var(
        "PRICE_SCOUT_CONFIG",
        tmp.path().join("missing.toml").display().to_string(),
    );

    let err = ScoutConfig::load().unwrap_err();
    assert!(err.to_string().contains("PRICE_SCOUT_CONFIG"));

    clear_env();
}

#[serial]
#[test]
fn unset_key_means_no_key() {
    clear_env();
    let cfg = ScoutConfig::load().expect("load");
    assert!(!cfg.has_api_key());
    assert_eq!(cfg.timeout_secs, 10);
}
