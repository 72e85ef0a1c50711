use std::fs;
use std::path::PathBuf;

use apprunner::config::Config;
use apprunner::error::{ConfigError, Error};
use tempfile::TempDir;

fn write_temp_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn config_loads_scheduler_and_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
system_domain = "192.168.11.11.xip.io"

[scheduler]
url = "http://receptor.192.168.11.11.xip.io"
username = "admin"
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.system_domain, "192.168.11.11.xip.io");
    assert_eq!(config.scheduler.username, "admin");
    assert_eq!(config.scheduler.timeout_secs, 30);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn config_rejects_missing_system_domain() {
    let dir = TempDir::new().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
[scheduler]
url = "http://receptor.example.com"
"#,
    );

    assert!(
        matches!(
            Config::load(&path),
            Err(Error::Config(ConfigError::MissingField {
                field: "system_domain"
            }))
        ),
        "Expected missing system_domain to be rejected"
    );
}

#[test]
fn config_rejects_dotted_system_domain() {
    let dir = TempDir::new().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
system_domain = ".example.com"

[scheduler]
url = "http://receptor.example.com"
"#,
    );

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "system_domain",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid system_domain error, got {err}"),
        Ok(config) => panic!(
            "Expected leading dot to be rejected, got {}",
            config.system_domain
        ),
    }
}

#[test]
fn config_rejects_invalid_scheduler_url() {
    let dir = TempDir::new().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
system_domain = "example.com"

[scheduler]
url = "not a url"
"#,
    );

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "scheduler.url",
            ..
        }))
    ));
}

#[test]
fn config_requires_scheduler_section() {
    let dir = TempDir::new().unwrap();
    let path = write_temp_config(&dir, "system_domain = \"example.com\"\n");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}
