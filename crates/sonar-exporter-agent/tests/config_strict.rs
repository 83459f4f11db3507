#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use sonar_exporter_agent::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
sonar:
  base_url: "http://sonar.local:9000"
  token: "squ_abc"
  tokn: "typo should fail"
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
sonar:
  base_url: "http://sonar.local:9000"
  token: "squ_abc"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.sonar.base_url, "http://sonar.local:9000");
    assert_eq!(cfg.listen, "0.0.0.0:8000");
    assert_eq!(cfg.poll_interval(), Duration::from_secs(30));
}

#[test]
fn overrides_listen_and_interval() {
    let ok = r#"
sonar:
  base_url: "http://sonar.local:9000"
  token: "squ_abc"
listen: "127.0.0.1:9100"
poll_interval_secs: 60
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.listen, "127.0.0.1:9100");
    assert_eq!(cfg.poll_interval_secs, 60);
}

#[test]
fn missing_sonar_section_fails() {
    let err = config::load_from_str("listen: \"0.0.0.0:8000\"\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn env_vars_build_config() {
    let vars: HashMap<&str, &str> = [
        (config::URL_ENV, "https://sonar.example.com"),
        (config::TOKEN_ENV, "squ_secret"),
    ]
    .into_iter()
    .collect();

    let cfg = config::load_from_vars(|k| vars.get(k).map(|v| v.to_string())).expect("must load");
    assert_eq!(cfg.sonar.base_url, "https://sonar.example.com");
    assert_eq!(cfg.sonar.token, "squ_secret");
    assert_eq!(cfg.listen, "0.0.0.0:8000");
}

#[test]
fn env_missing_token_names_the_variable() {
    let err = config::load_from_vars(|k| (k == config::URL_ENV).then(|| "http://x".to_string()))
        .expect_err("must fail");
    assert!(err.to_string().contains(config::TOKEN_ENV));
}

#[test]
fn debug_output_redacts_token() {
    let cfg = config::load_from_str("sonar:\n  base_url: \"http://s\"\n  token: \"squ_topsecret\"\n").unwrap();
    let dbg = format!("{cfg:?}");
    assert!(!dbg.contains("squ_topsecret"));
    assert!(dbg.contains("<redacted>"));
}

#[test]
fn env_file_builds_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# deployment secrets").unwrap();
    writeln!(file, "SONARQUBE_URL=http://sonar.internal:9000").unwrap();
    writeln!(file, "SONARQUBE_TOKEN=\"squ_from_file\"").unwrap();

    let cfg = config::load_from_env_file(file.path()).expect("must load");
    assert_eq!(cfg.sonar.base_url, "http://sonar.internal:9000");
    assert_eq!(cfg.sonar.token, "squ_from_file");
    assert_eq!(cfg.poll_interval(), Duration::from_secs(30));
}

#[test]
fn env_file_missing_token_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "SONARQUBE_URL=http://sonar.internal:9000").unwrap();

    let err = config::load_from_env_file(file.path()).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
    assert!(err.to_string().contains(config::TOKEN_ENV));
}

#[test]
fn unreadable_env_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = config::load_from_env_file(&dir.path().join("absent.env")).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}
