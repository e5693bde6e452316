//! Integration tests for clusterload-config

use clusterload_config::*;
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = ClusterloadConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("CLUSTERLOAD_HOST", Some("http://target.internal:9000")),
        ("CLUSTERLOAD_USERS", Some("50")),
        ("CLUSTERLOAD_SPAWN_RATE", Some("2.5")),
        ("CLUSTERLOAD_RUN_TIME", Some("120")),
        ("CLUSTERLOAD_WAIT", Some("between:1:2")),
        ("CLUSTERLOAD_HTTP_TIMEOUT", Some("5")),
        ("CLUSTERLOAD_LOG_LEVEL", Some("debug")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.target.host, "http://target.internal:9000");
        assert_eq!(config.swarm.users, 50);
        assert_eq!(config.swarm.spawn_rate, 2.5);
        assert_eq!(config.swarm.run_time, Some(Duration::from_secs(120)));
        assert_eq!(
            config.swarm.pacing,
            PacingConfig::Between { min: 1.0, max: 2.0 }
        );
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.logging.level, LogLevel::Debug);
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("CLUSTERLOAD_USERS", Some("many"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("CLUSTERLOAD_USERS"));
    });
}

#[test]
fn test_env_override_still_validated() {
    with_vars(vec![("CLUSTERLOAD_USERS", Some("0"))], || {
        assert!(ConfigLoader::new().from_env().is_err());
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("LOADTEST_USERS", Some("7"))], || {
        let config = ConfigLoader::with_prefix("LOADTEST").from_env().unwrap();
        assert_eq!(config.swarm.users, 7);
    });
}

#[test]
fn test_yaml_config_serialization() {
    let config = ClusterloadConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();

    let parsed: ClusterloadConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
}

#[test]
fn test_generated_sample_is_valid() {
    let sample = ClusterloadConfig::generate_sample().unwrap();
    let parsed: ClusterloadConfig = serde_yaml::from_str(&sample).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.swarm.users, 10);
}

#[test]
fn test_config_from_file() {
    let yaml = r#"
target:
  host: "https://clusters.example.com"
  identifiers:
    - "4a09785674d14344d92b1212b6e810369535ea1c"
    - "c544b2178af4a4428cd1e12ca26d6428e3d24276"

swarm:
  users: 20
  spawn_rate: 4
  run_time: 30
  seed: 42
  pacing:
    type: constant
    seconds: 0.25

http:
  timeout: 10
  user_agent: "Test Agent"

logging:
  level: warn
  format: json
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    temp_env::with_vars_unset(vec!["CLUSTERLOAD_USERS", "CLUSTERLOAD_HOST"], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();

        assert_eq!(config.target.host, "https://clusters.example.com");
        assert_eq!(config.target.identifiers.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.swarm.users, 20);
        assert_eq!(config.swarm.spawn_rate, 4.0);
        assert_eq!(config.swarm.run_time, Some(Duration::from_secs(30)));
        assert_eq!(config.swarm.seed, Some(42));
        assert_eq!(config.swarm.pacing, PacingConfig::Constant { seconds: 0.25 });
        assert_eq!(config.http.timeout, Duration::from_secs(10));
        assert_eq!(config.http.user_agent, "Test Agent");
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn test_invalid_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"swarm:\n  users: 0\n").unwrap();

    temp_env::with_vars_unset(vec!["CLUSTERLOAD_USERS"], || {
        let err = ConfigLoader::new().from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { .. }));
    });
}

#[test]
fn test_missing_file() {
    let err = ConfigLoader::new()
        .from_file("/definitely/not/here.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}

#[test]
fn test_unvalidated_load_defers_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"swarm:\n  users: 0\n").unwrap();

    with_vars(vec![("CLUSTERLOAD_USERS", None::<&str>), ("CLUSTERLOAD_SPAWN_RATE", Some("3"))], || {
        let mut config = ConfigLoader::new()
            .load_unvalidated(Some(file.path()))
            .unwrap();
        assert_eq!(config.swarm.users, 0);
        assert_eq!(config.swarm.spawn_rate, 3.0);
        assert!(config.validate_all().is_err());

        config.swarm.users = 5;
        assert!(config.validate_all().is_ok());
    });
}
