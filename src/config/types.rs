//! Raw configuration types, as written in the config file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::issues::Severity;

/// Top-level configuration document.
///
/// ```yaml
/// excludes:
///   global:
///     fqns: ["rx:^kube-system/"]
///   linters:
///     pods:
///       codes: ["102"]
///       instances:
///         - labels:
///             app: [b]
/// codes:
///   "101":
///     severity: error
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub excludes: ExclusionsConfig,
    /// Severity overrides keyed by code.
    pub codes: BTreeMap<String, CodeOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionsConfig {
    pub global: ExcludeConfig,
    /// Keyed by resource kind, e.g. `pods`.
    pub linters: BTreeMap<String, LinterConfig>,
}

/// One rule. Values are literals, or regexes when prefixed with `rx:`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    pub fqns: Vec<RawExpression>,
    pub labels: BTreeMap<String, Vec<RawExpression>>,
    pub annotations: BTreeMap<String, Vec<RawExpression>>,
    pub containers: Vec<RawExpression>,
    pub codes: Vec<RawExpression>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinterConfig {
    pub codes: Vec<RawExpression>,
    pub instances: Vec<ExcludeConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOverride {
    pub severity: Severity,
}

/// An expression as written. Codes are often written as bare numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawExpression {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawExpression::Number(n) => write!(f, "{n}"),
            RawExpression::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawExpression {
    fn from(s: &str) -> Self {
        RawExpression::Text(s.to_string())
    }
}
