//! Configuration loading and compilation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::ConfigError;
use super::types::{Config, ExcludeConfig, ExclusionsConfig, LinterConfig, RawExpression};
use crate::exclusion::{Exclude, ExclusionError, Exclusions, LinterExcludes};
use crate::issues::CodeGlossary;
use crate::types::Code;

/// File names probed by [`Config::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".kube-sanity.yaml",
    ".kube-sanity.yml",
    ".kube-sanity.json",
    ".kube-sanity.toml",
];

impl Config {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                path: path.display().to_string(),
                source: e,
            }),
            "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: path.display().to_string(),
                source: e,
            }),
            "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
                path: path.display().to_string(),
                source: e,
            }),
            _ => Err(ConfigError::UnsupportedFormat(
                path.display().to_string(),
                ext,
            )),
        }?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: "<inline>".to_string(),
            source: e,
        })
    }

    /// The first config file found in `root`, if any.
    pub fn find(root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Load the first config file found in `root`.
    ///
    /// Returns `Ok(None)` when there is none. A file that exists but fails
    /// to parse is an error, not a fallback to defaults.
    pub fn discover(root: &Path) -> Result<Option<Self>, ConfigError> {
        Self::find(root).map(|path| Self::from_file(&path)).transpose()
    }

    /// Compile the suppression rules. Every regex is compiled here.
    pub fn exclusions(&self) -> Result<Exclusions, ConfigError> {
        self.excludes.compile()
    }

    /// The builtin glossary with this configuration's severity overrides.
    pub fn glossary(&self) -> Result<CodeGlossary, ConfigError> {
        let mut glossary = CodeGlossary::builtin();
        self.apply_overrides(&mut glossary)?;
        Ok(glossary)
    }

    pub fn apply_overrides(&self, glossary: &mut CodeGlossary) -> Result<(), ConfigError> {
        for (raw, over) in &self.codes {
            let code: u32 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidCode(raw.clone()))?;
            if !glossary.override_severity(Code::new(code), over.severity) {
                return Err(ConfigError::UnknownCode(code));
            }
            debug!(code, severity = %over.severity, "Overrode code severity");
        }
        Ok(())
    }
}

impl ExclusionsConfig {
    pub fn compile(&self) -> Result<Exclusions, ConfigError> {
        let global = self.global.compile().map_err(|source| ConfigError::Exclusion {
            scope: "global".to_string(),
            source,
        })?;

        let mut exclusions = Exclusions::new().with_global(global);
        for (kind, linter) in &self.linters {
            exclusions = exclusions.with_linter(kind.as_str(), linter.compile(kind)?);
        }
        Ok(exclusions)
    }
}

impl LinterConfig {
    fn compile(&self, kind: &str) -> Result<LinterExcludes, ConfigError> {
        let mut linter = LinterExcludes::new()
            .with_codes(texts(&self.codes))
            .map_err(|source| ConfigError::Exclusion {
                scope: format!("linters.{kind}.codes"),
                source,
            })?;

        for (i, instance) in self.instances.iter().enumerate() {
            let compiled = instance.compile().map_err(|source| ConfigError::Exclusion {
                scope: format!("linters.{kind}.instances[{i}]"),
                source,
            })?;
            linter = linter.with_instance(compiled);
        }
        Ok(linter)
    }
}

impl ExcludeConfig {
    pub fn compile(&self) -> Result<Exclude, ExclusionError> {
        let mut exclude = Exclude::new()
            .with_fqns(texts(&self.fqns))?
            .with_containers(texts(&self.containers))?
            .with_codes(texts(&self.codes))?;
        for (key, values) in &self.labels {
            exclude = exclude.with_labels(key, texts(values))?;
        }
        for (key, values) in &self.annotations {
            exclude = exclude.with_annotations(key, texts(values))?;
        }
        Ok(exclude)
    }
}

fn texts(raw: &[RawExpression]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}
