//! The code glossary: numeric code to message template and severity.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Write};

use super::severity::Severity;
use crate::types::Code;

pub const DEFAULT_PREFIX: &str = "POP";

/// Code recorded by [`Collector::add_err`](super::Collector::add_err).
pub const INTERNAL_ERROR: Code = Code::new(666);

/// Builtin codes, grouped by the kind of object that raises them.
const BUILTIN: &[(u32, Severity, &str)] = &[
    // Containers
    (100, Severity::Error, "Untagged docker image in use"),
    (101, Severity::Warn, "Image tagged \"latest\" in use"),
    (102, Severity::Info, "No probes defined"),
    (103, Severity::Warn, "No liveness probe"),
    (104, Severity::Warn, "No readiness probe"),
    (106, Severity::Warn, "No resources requests/limits defined"),
    (107, Severity::Warn, "No resource limits defined"),
    (109, Severity::Error, "CPU request ({}) exceeds limit ({})"),
    (110, Severity::Error, "Memory request ({}) exceeds limit ({})"),
    // Pods
    (200, Severity::Info, "Pod has no labels"),
    (208, Severity::Error, "Owner {} {} is not present in the cluster"),
    (300, Severity::Warn, "Uses \"default\" ServiceAccount"),
    // Engine
    (666, Severity::Error, "{}"),
    // Services
    (1100, Severity::Error, "No pods match service selector"),
    (1101, Severity::Info, "Service has no selector"),
    // Network policies
    (1200, Severity::Warn, "No pods match pod selector"),
    (1201, Severity::Error, "Except CIDR {} is not contained in block {}"),
    (1202, Severity::Error, "Invalid IP block: {}"),
    (1203, Severity::Warn, "No pods match {} pod selector in namespace {}"),
    // RBAC
    (1300, Severity::Error, "ServiceAccount {} is not present in the cluster"),
    (1301, Severity::Warn, "Binding has no subjects"),
];

/// Template and severity of one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSpec {
    pub message: String,
    pub severity: Severity,
}

impl CodeSpec {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Immutable once a run starts; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeGlossary {
    prefix: String,
    codes: FxHashMap<Code, CodeSpec>,
}

impl Default for CodeGlossary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CodeGlossary {
    /// An empty glossary with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            codes: FxHashMap::default(),
        }
    }

    pub fn builtin() -> Self {
        let mut glossary = Self::new();
        for &(code, severity, message) in BUILTIN {
            glossary.insert(Code::new(code), CodeSpec::new(message, severity));
        }
        glossary
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<Code>, message: &str, severity: Severity) -> Self {
        self.insert(code.into(), CodeSpec::new(message, severity));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get(&self, code: Code) -> Option<&CodeSpec> {
        self.codes.get(&code)
    }

    pub fn severity(&self, code: Code) -> Option<Severity> {
        self.get(code).map(|spec| spec.severity)
    }

    /// Adds or replaces a code.
    pub fn insert(&mut self, code: Code, spec: CodeSpec) -> Option<CodeSpec> {
        self.codes.insert(code, spec)
    }

    /// Returns `false` if the code is unknown.
    pub fn override_severity(&mut self, code: Code, severity: Severity) -> bool {
        match self.codes.get_mut(&code) {
            Some(spec) => {
                spec.severity = severity;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Render `code` as `[<prefix>-<code>] <text>`, filling `{}` placeholders
    /// left to right. Surplus placeholders are kept as-is and surplus
    /// arguments are ignored.
    pub fn render(&self, code: Code, args: &[&dyn Display]) -> Option<String> {
        let spec = self.get(code)?;
        let mut out = format!("[{}-{}] ", self.prefix, code);
        fill_template(&mut out, &spec.message, args).ok()?;
        Some(out)
    }
}

fn fill_template(out: &mut String, template: &str, args: &[&dyn Display]) -> fmt::Result {
    let mut args = args.iter();
    let mut pieces = template.split("{}").peekable();
    while let Some(piece) = pieces.next() {
        out.push_str(piece);
        if pieces.peek().is_none() {
            break;
        }
        match args.next() {
            Some(arg) => write!(out, "{arg}")?,
            None => out.push_str("{}"),
        }
    }
    Ok(())
}
