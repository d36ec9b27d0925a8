//! Parallel execution of checks over one snapshot.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{Check, CheckContext, NetworkPolicyCheck, PodCheck, RoleBindingCheck, ServiceCheck};
use crate::exclusion::Exclusions;
use crate::issues::{CodeGlossary, Collector, Outcome};
use crate::store::ReadTxn;
use crate::tally::{LinterTally, SeverityTally};
use crate::types::ResourceKind;

/// A check that could not run at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    pub check: String,
    pub kind: ResourceKind,
    pub error: String,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub outcomes: BTreeMap<ResourceKind, Outcome>,
    pub tally: LinterTally,
    pub failures: Vec<CheckFailure>,
}

impl Report {
    pub fn outcome(&self, kind: &ResourceKind) -> Option<&Outcome> {
        self.outcomes.get(kind)
    }

    /// Objects of `kind` counted by their worst finding.
    pub fn severity_rollup(&self, kind: &ResourceKind) -> SeverityTally {
        self.outcome(kind)
            .map(Outcome::severity_rollup)
            .unwrap_or_default()
    }

    /// Objects of every kind counted by their worst finding.
    pub fn total_rollup(&self) -> SeverityTally {
        let mut total = SeverityTally::default();
        for outcome in self.outcomes.values() {
            total.merge(&outcome.severity_rollup());
        }
        total
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.outcomes.values().all(|o| o.finding_count() == 0)
    }

    fn absorb(&mut self, kind: ResourceKind, outcome: Outcome) {
        self.tally.insert(kind.clone(), outcome.namespace_tally());
        self.outcomes.entry(kind).or_default().merge(outcome);
    }
}

/// Runs a set of checks concurrently, one collector per check, and folds
/// the results together afterwards on the calling thread.
pub struct Runner {
    checks: Vec<Box<dyn Check>>,
    glossary: Arc<CodeGlossary>,
    exclusions: Arc<Exclusions>,
}

impl Runner {
    pub fn new(glossary: Arc<CodeGlossary>, exclusions: Arc<Exclusions>) -> Self {
        Self {
            checks: Vec::new(),
            glossary,
            exclusions,
        }
    }

    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Adds every check shipped with the crate.
    pub fn with_builtin_checks(self) -> Self {
        self.with_check(PodCheck::new())
            .with_check(ServiceCheck::new())
            .with_check(NetworkPolicyCheck::new())
            .with_check(RoleBindingCheck::new())
            .with_check(RoleBindingCheck::cluster())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check against `txn`. Checks whose kind was never loaded are
    /// skipped.
    pub fn run(&self, txn: &ReadTxn) -> Report {
        let results: Vec<_> = self
            .checks
            .par_iter()
            .map(|check| (check, self.run_check(check.as_ref(), txn)))
            .collect();

        let mut report = Report::default();
        for (check, result) in results {
            match result {
                Ok(Some(outcome)) => report.absorb(check.kind().clone(), outcome),
                Ok(None) => {}
                Err(err) => {
                    warn!(check = check.name(), kind = %check.kind(), error = %err, "Check failed");
                    report.failures.push(CheckFailure {
                        check: check.name().to_string(),
                        kind: check.kind().clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        report.tally.compact();
        report
    }

    fn run_check(&self, check: &dyn Check, txn: &ReadTxn) -> crate::Result<Option<Outcome>> {
        if !txn.is_loaded(check.kind())? {
            debug!(check = check.name(), kind = %check.kind(), "Kind not loaded, skipping");
            return Ok(None);
        }

        let mut collector = Collector::new(
            check.kind().clone(),
            Arc::clone(&self.glossary),
            Arc::clone(&self.exclusions),
        );
        check.run(&CheckContext::new(txn), &mut collector)?;
        debug!(
            check = check.name(),
            objects = collector.outcome().len(),
            findings = collector.outcome().finding_count(),
            "Check finished"
        );
        Ok(Some(collector.into_outcome()))
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("checks", &self.checks.iter().map(|c| c.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
