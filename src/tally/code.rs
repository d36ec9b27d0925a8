use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::severity::SeverityTally;
use crate::issues::CodeGlossary;
use crate::types::Code;

/// Finding counts per code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeTally(BTreeMap<Code, u64>);

impl CodeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(&mut self, code: Code) {
        self.add(code, 1);
    }

    /// Adds `count` to `code`, creating the entry even for a zero count.
    pub fn add(&mut self, code: Code, count: u64) {
        let entry = self.0.entry(code).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn get(&self, code: Code) -> u64 {
        self.0.get(&code).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Code, u64)> + '_ {
        self.0.iter().map(|(code, count)| (*code, *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().fold(0, |acc, n| acc.saturating_add(*n))
    }

    /// Pointwise sum.
    pub fn merge(&mut self, other: &CodeTally) {
        for (code, count) in other.iter() {
            self.add(code, count);
        }
    }

    pub fn merged(mut self, other: &CodeTally) -> CodeTally {
        self.merge(other);
        self
    }

    /// Drop zero counts.
    pub fn compact(&mut self) {
        self.0.retain(|_, count| *count > 0);
    }

    /// Totals per severity. Codes missing from the glossary are skipped.
    pub fn rollup(&self, glossary: &CodeGlossary) -> SeverityTally {
        let mut tally = SeverityTally::default();
        for (code, count) in self.iter() {
            if let Some(severity) = glossary.severity(code) {
                tally.add(severity, count);
            }
        }
        tally
    }
}

impl FromIterator<(Code, u64)> for CodeTally {
    fn from_iter<T: IntoIterator<Item = (Code, u64)>>(iter: T) -> Self {
        let mut tally = CodeTally::new();
        for (code, count) in iter {
            tally.add(code, count);
        }
        tally
    }
}
