use std::time::Duration;

use anyhow::Result;
use nudge_service::{config::Config, generator::PayloadMode};

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Test: Only the API key is required; everything else has defaults
#[test]
fn test_defaults_apply() -> Result<()> {
    let config = Config::from_vars(vars(&[("GEMINI_API_KEY", "secret")]))?;

    assert_eq!(config.gemini_model, "gemini-2.5-flash");
    assert_eq!(config.payload_mode, PayloadMode::Events);
    assert_eq!(config.milestone_threshold, 95);
    assert_eq!(config.server_port, 8000);
    assert_eq!(config.generation_timeout(), Duration::from_secs(30));

    let retry = config.retry_config();
    assert_eq!(retry.max_attempts, 3);
    assert_eq!(retry.initial_delay_ms, 1000);
    assert_eq!(retry.max_jitter_ms, 500);

    Ok(())
}

/// Test: A missing API key fails at load time
#[test]
fn test_missing_api_key_fails_fast() {
    let result = Config::from_vars(vars(&[("SERVER_PORT", "9000")]));
    assert!(result.is_err());
}

/// Test: A blank API key is rejected
#[test]
fn test_blank_api_key_rejected() {
    let result = Config::from_vars(vars(&[("GEMINI_API_KEY", "   ")]));
    assert!(result.is_err());
}

/// Test: Overrides are read from the environment
#[test]
fn test_overrides_are_applied() -> Result<()> {
    let config = Config::from_vars(vars(&[
        ("GEMINI_API_KEY", "secret"),
        ("PAYLOAD_MODE", "snapshot"),
        ("MILESTONE_THRESHOLD", "100"),
        ("MAX_RETRY_ATTEMPTS", "5"),
        ("GENERATION_TIMEOUT_SECONDS", "12"),
    ]))?;

    assert_eq!(config.payload_mode, PayloadMode::Snapshot);
    assert_eq!(config.extraction_policy().milestone_threshold, 100);
    assert_eq!(config.retry_config().max_attempts, 5);
    assert_eq!(config.generation_timeout(), Duration::from_secs(12));

    Ok(())
}

/// Test: Out-of-range policy values are rejected
#[test]
fn test_invalid_policy_rejected() {
    for (key, value) in [
        ("MILESTONE_THRESHOLD", "0"),
        ("MILESTONE_THRESHOLD", "101"),
        ("MAX_RETRY_ATTEMPTS", "0"),
        ("PAYLOAD_MODE", "raw"),
    ] {
        let result = Config::from_vars(vars(&[("GEMINI_API_KEY", "secret"), (key, value)]));
        assert!(result.is_err(), "{}={} should be rejected", key, value);
    }
}
