use flowgate_config::load_toml;

#[test]
fn empty_toml_yields_working_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults should validate");
    assert_eq!(cfg.broker.host, "broker.hivemq.com");
    assert_eq!(cfg.broker.port, 1883);
    assert_eq!(cfg.broker.control_topic, "smartwater/control");
    assert_eq!(cfg.broker.params_topic, "smartwater/params");
    assert_eq!(cfg.feed.refresh_secs, 10);
    assert_eq!(cfg.feed.cache_ttl_secs, 10);
    assert_eq!(cfg.fallback.client_id, "esp32-client-1");
    assert_eq!(cfg.fallback.interval, 10_000);
    assert_eq!(cfg.fallback.tariff, 10_000);
}

#[test]
fn rejects_zero_refresh_interval() {
    let toml = r#"
[feed]
refresh_secs = 0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject refresh_secs=0");
    assert!(
        format!("{err}")
            .to_lowercase()
            .contains("refresh_secs must be >= 1")
    );
}

#[test]
fn rejects_zero_broker_port() {
    let toml = r#"
[broker]
port = 0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject port=0");
    assert!(format!("{err}").contains("broker.port must be > 0"));
}

#[test]
fn rejects_identical_topics() {
    let toml = r#"
[broker]
control_topic = "smartwater/x"
params_topic = "smartwater/x"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject equal topics");
    assert!(format!("{err}").contains("must differ"));
}

#[test]
fn rejects_unknown_rotation() {
    let toml = r#"
[logging]
rotation = "weekly"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject rotation=weekly");
    assert!(format!("{err}").contains("never|daily|hourly"));
}

#[test]
fn accepts_overridden_feed_and_broker() {
    let toml = r#"
[feed]
url = "data/telemetry.csv"
refresh_secs = 5
cache_ttl_secs = 5

[broker]
host = "10.0.0.7"
port = 1884
publish_timeout_ms = 1500
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.feed.url, "data/telemetry.csv");
    assert_eq!(cfg.broker.host, "10.0.0.7");
    assert_eq!(cfg.broker.publish_timeout_ms, 1500);
}
