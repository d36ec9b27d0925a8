use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::finding::Finding;
use super::severity::Severity;
use crate::tally::{CodeTally, NamespaceTally, SeverityTally};
use crate::types::Fqn;

/// Findings of one kind, per object. Findings keep the order in which they
/// were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outcome(BTreeMap<Fqn, Vec<Finding>>);

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object with no findings. Registering twice keeps what
    /// was already recorded.
    pub fn init(&mut self, fqn: Fqn) {
        self.0.entry(fqn).or_default();
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.0.contains_key(fqn)
    }

    /// Returns `false` when `fqn` was never registered.
    pub(crate) fn push(&mut self, fqn: &str, finding: Finding) -> bool {
        match self.0.get_mut(fqn) {
            Some(findings) => {
                findings.push(finding);
                true
            }
            None => false,
        }
    }

    /// Append `other`'s findings after this outcome's, object by object.
    pub fn merge(&mut self, other: Outcome) {
        for (fqn, findings) in other.0 {
            self.0.entry(fqn).or_default().extend(findings);
        }
    }

    pub fn get(&self, fqn: &str) -> Option<&[Finding]> {
        self.0.get(fqn).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fqn, &[Finding])> {
        self.0.iter().map(|(fqn, findings)| (fqn, findings.as_slice()))
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Worst severity recorded for `fqn`; `Ok` for a clean object and `None`
    /// for an unregistered one.
    pub fn max_severity(&self, fqn: &str) -> Option<Severity> {
        self.0.get(fqn).map(|findings| worst(findings))
    }

    /// Copy keeping only findings at or above `min`. Every object stays
    /// registered.
    pub fn filter(&self, min: Severity) -> Outcome {
        Outcome(
            self.0
                .iter()
                .map(|(fqn, findings)| {
                    let kept = findings
                        .iter()
                        .filter(|f| f.severity >= min)
                        .cloned()
                        .collect();
                    (fqn.clone(), kept)
                })
                .collect(),
        )
    }

    pub fn code_tally(&self) -> CodeTally {
        let mut tally = CodeTally::new();
        for code in self.0.values().flatten().filter_map(|f| f.code) {
            tally.incr(code);
        }
        tally
    }

    pub fn namespace_tally(&self) -> NamespaceTally {
        let mut tally = NamespaceTally::new();
        for (fqn, findings) in &self.0 {
            for code in findings.iter().filter_map(|f| f.code) {
                tally.record(fqn.namespace(), code);
            }
        }
        tally
    }

    /// Objects counted by their worst finding.
    pub fn severity_rollup(&self) -> SeverityTally {
        let mut tally = SeverityTally::default();
        for findings in self.0.values() {
            tally.add(worst(findings), 1);
        }
        tally
    }
}

fn worst(findings: &[Finding]) -> Severity {
    findings
        .iter()
        .map(|f| f.severity)
        .max()
        .unwrap_or(Severity::Ok)
}
