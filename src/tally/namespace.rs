use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::code::CodeTally;
use super::severity::SeverityTally;
use crate::issues::CodeGlossary;
use crate::types::{Code, ResourceKind};

/// Code tallies per namespace. Cluster-scoped objects count under `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceTally(BTreeMap<String, CodeTally>);

impl NamespaceTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, namespace: &str, code: Code) {
        self.0.entry(namespace.to_string()).or_default().incr(code);
    }

    pub fn insert(&mut self, namespace: impl Into<String>, tally: CodeTally) {
        self.0.entry(namespace.into()).or_default().merge(&tally);
    }

    pub fn get(&self, namespace: &str) -> Option<&CodeTally> {
        self.0.get(namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodeTally)> {
        self.0.iter().map(|(ns, tally)| (ns.as_str(), tally))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn merge(&mut self, other: &NamespaceTally) {
        for (namespace, tally) in &other.0 {
            self.0.entry(namespace.clone()).or_default().merge(tally);
        }
    }

    /// Compacts every namespace and drops the ones left empty.
    pub fn compact(&mut self) {
        self.0.retain(|_, tally| {
            tally.compact();
            !tally.is_empty()
        });
    }

    /// All namespaces folded into one code tally.
    pub fn codes(&self) -> CodeTally {
        self.0
            .values()
            .fold(CodeTally::new(), |acc, tally| acc.merged(tally))
    }

    pub fn rollup(&self, glossary: &CodeGlossary) -> SeverityTally {
        self.codes().rollup(glossary)
    }
}

/// Namespace tallies per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinterTally(BTreeMap<ResourceKind, NamespaceTally>);

impl LinterTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: &ResourceKind, namespace: &str, code: Code) {
        self.0
            .entry(kind.clone())
            .or_default()
            .record(namespace, code);
    }

    pub fn insert(&mut self, kind: ResourceKind, tally: NamespaceTally) {
        self.0.entry(kind).or_default().merge(&tally);
    }

    pub fn get(&self, kind: &ResourceKind) -> Option<&NamespaceTally> {
        self.0.get(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKind, &NamespaceTally)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn merge(&mut self, other: &LinterTally) {
        for (kind, tally) in &other.0 {
            self.0.entry(kind.clone()).or_default().merge(tally);
        }
    }

    /// Compacts every kind and drops the ones left empty.
    pub fn compact(&mut self) {
        self.0.retain(|_, tally| {
            tally.compact();
            !tally.is_empty()
        });
    }

    pub fn rollup(&self, glossary: &CodeGlossary) -> SeverityTally {
        let mut total = SeverityTally::default();
        for tally in self.0.values() {
            total.merge(&tally.rollup(glossary));
        }
        total
    }
}
