//! Per-check finding sink.

use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, trace};

use super::codes::{CodeGlossary, INTERNAL_ERROR};
use super::context::FindingContext;
use super::error::IssueError;
use super::finding::{Finding, ROOT_GROUP};
use super::outcome::Outcome;
use super::severity::Severity;
use crate::exclusion::{Exclusions, Spec};
use crate::types::{Code, Fqn, ResourceKind};

/// Records findings for one kind, consulting the suppression rules on the
/// way in.
///
/// Each check owns its own collector, so no locking is involved. The
/// glossary and exclusions are shared read-only.
#[derive(Debug)]
pub struct Collector {
    kind: ResourceKind,
    glossary: Arc<CodeGlossary>,
    exclusions: Arc<Exclusions>,
    outcome: Outcome,
}

impl Collector {
    pub fn new(
        kind: impl Into<ResourceKind>,
        glossary: Arc<CodeGlossary>,
        exclusions: Arc<Exclusions>,
    ) -> Self {
        Self {
            kind: kind.into(),
            glossary,
            exclusions,
            outcome: Outcome::new(),
        }
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn glossary(&self) -> &CodeGlossary {
        &self.glossary
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    /// Register an object so it shows up in the outcome even when clean.
    pub fn init_outcome(&mut self, fqn: impl Into<Fqn>) {
        self.outcome.init(fqn.into());
    }

    /// Report `code` against the object as a whole.
    ///
    /// Returns `Ok(false)` when a suppression rule silenced the finding.
    pub fn add_code(
        &mut self,
        ctx: &FindingContext,
        code: impl Into<Code>,
        args: &[&dyn Display],
    ) -> Result<bool, IssueError> {
        let code = code.into();
        let spec = ctx.spec(code);
        self.record(ctx, code, ROOT_GROUP, spec, args)
    }

    /// Report `code` under a sub-group of the object, usually one container.
    /// Suppression sees the group as the only container name.
    pub fn add_sub_code(
        &mut self,
        ctx: &FindingContext,
        code: impl Into<Code>,
        group: &str,
        args: &[&dyn Display],
    ) -> Result<bool, IssueError> {
        let code = code.into();
        let spec = ctx.spec(code).with_containers([group]);
        self.record(ctx, code, group, spec, args)
    }

    /// Record an engine failure against the object. Never suppressed, and
    /// registers the object if the check had not done so yet.
    pub fn add_err(&mut self, ctx: &FindingContext, err: &dyn Display) {
        debug!(kind = %ctx.kind, fqn = %ctx.fqn, error = %err, "Check failed on object");
        let message = self
            .glossary
            .render(INTERNAL_ERROR, &[err])
            .unwrap_or_else(|| err.to_string());
        self.outcome.init(ctx.fqn.clone());
        self.outcome.push(
            ctx.fqn.as_str(),
            Finding::new(INTERNAL_ERROR, Severity::Error, message),
        );
    }

    fn record(
        &mut self,
        ctx: &FindingContext,
        code: Code,
        group: &str,
        spec: Spec,
        args: &[&dyn Display],
    ) -> Result<bool, IssueError> {
        if !self.outcome.contains(ctx.fqn.as_str()) {
            return Err(IssueError::UnregisteredFqn {
                kind: ctx.kind.clone(),
                fqn: ctx.fqn.clone(),
            });
        }
        let severity = self
            .glossary
            .severity(code)
            .ok_or(IssueError::UnknownCode(code))?;

        if self.exclusions.is_excluded(&spec) {
            trace!(kind = %ctx.kind, fqn = %ctx.fqn, %code, "Finding suppressed");
            return Ok(false);
        }

        let message = self
            .glossary
            .render(code, args)
            .ok_or(IssueError::UnknownCode(code))?;
        self.outcome.push(
            ctx.fqn.as_str(),
            Finding::new(code, severity, message).with_group(group),
        );
        Ok(true)
    }
}
