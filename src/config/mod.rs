//! Configuration: suppression rules and code severity overrides, read from
//! YAML, JSON or TOML.
//!
//! ## Layers
//! - `types`: raw document types, deserialized as written
//! - `loading`: file loading, discovery and compilation into engine types

mod error;
mod loading;
mod types;

pub use error::ConfigError;
pub use loading::CONFIG_FILE_NAMES;
pub use types::{CodeOverride, Config, ExcludeConfig, ExclusionsConfig, LinterConfig, RawExpression};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::Spec;
    use crate::issues::{CodeGlossary, Severity};
    use crate::types::Code;
    use std::fs;
    use tempfile::TempDir;

    const YAML: &str = r#"
excludes:
  global:
    fqns: ["rx:^kube-system/"]
  linters:
    pods:
      codes: [102, "rx:^10[34]$"]
      instances:
        - labels:
            app: [b]
codes:
  "101":
    severity: error
"#;

    #[test]
    fn test_default_config_is_empty() {
        let config = Config::default();
        assert!(config.exclusions().unwrap().is_empty());
        assert_eq!(config.glossary().unwrap(), CodeGlossary::builtin());
    }

    #[test]
    fn test_yaml_compiles_to_exclusions() {
        let config = Config::from_yaml_str(YAML).unwrap();
        let exclusions = config.exclusions().unwrap();

        assert!(exclusions.is_excluded(&Spec::new("services", "kube-system/dns")));
        assert!(exclusions.is_excluded(&Spec::new("pods", "default/p1").with_code(102u32)));
        assert!(exclusions.is_excluded(&Spec::new("pods", "default/p1").with_code(104u32)));
        assert!(!exclusions.is_excluded(&Spec::new("pods", "default/p1").with_code(105u32)));
        assert!(exclusions.is_excluded(&Spec::new("pods", "default/p2").with_label("app", "b")));
        assert!(!exclusions.is_excluded(&Spec::new("services", "default/p2").with_label("app", "b")));
    }

    #[test]
    fn test_severity_overrides() {
        let config = Config::from_yaml_str(YAML).unwrap();
        let glossary = config.glossary().unwrap();
        assert_eq!(glossary.severity(Code::new(101)), Some(Severity::Error));
    }

    #[test]
    fn test_override_unknown_code() {
        let config = Config::from_yaml_str("codes:\n  \"4242\":\n    severity: warn\n").unwrap();
        assert!(matches!(config.glossary(), Err(ConfigError::UnknownCode(4242))));

        let config = Config::from_yaml_str("codes:\n  abc:\n    severity: warn\n").unwrap();
        assert!(matches!(config.glossary(), Err(ConfigError::InvalidCode(c)) if c == "abc"));
    }

    #[test]
    fn test_invalid_regex_names_scope() {
        let yaml = "excludes:\n  linters:\n    pods:\n      instances:\n        - fqns: [\"rx:(\"]\n";
        let err = Config::from_yaml_str(yaml).unwrap().exclusions().unwrap_err();
        match err {
            ConfigError::Exclusion { scope, .. } => assert_eq!(scope, "linters.pods.instances[0]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_file_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"excludes": {"global": {"labels": {"tier": ["web"]}}}}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        let exclusions = config.exclusions().unwrap();
        assert!(exclusions.is_excluded(&Spec::new("pods", "ns/x").with_label("tier", "web")));
    }

    #[test]
    fn test_from_file_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[excludes.linters.services]
codes = ["1101"]

[codes.1100]
severity = "warn"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.glossary().unwrap().severity(Code::new(1100)),
            Some(Severity::Warn)
        );
        assert!(
            config
                .exclusions()
                .unwrap()
                .is_excluded(&Spec::new("services", "default/s").with_code(1101u32))
        );
    }

    #[test]
    fn test_from_file_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::UnsupportedFormat(_, ext)) if ext == "ini"
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::from_file(&dir.path().join("nope.yaml")),
            Err(ConfigError::ReadFile { .. })
        ));
    }

    #[test]
    fn test_discover_order_and_errors() {
        let dir = TempDir::new().unwrap();
        assert!(Config::discover(dir.path()).unwrap().is_none());

        fs::write(dir.path().join(".kube-sanity.toml"), "[codes.101]\nseverity = \"info\"\n")
            .unwrap();
        fs::write(dir.path().join(".kube-sanity.yaml"), YAML).unwrap();
        let found = Config::discover(dir.path()).unwrap().unwrap();
        assert_eq!(found.codes["101"].severity, Severity::Error);

        fs::write(dir.path().join(".kube-sanity.yaml"), "excludes: [").unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(ConfigError::ParseYaml { .. })
        ));
    }
}
