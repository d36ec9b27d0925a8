//! The suppression-matching projection of a finding.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{Code, Fqn, ResourceKind};

/// Everything a suppression rule may look at when deciding whether a
/// finding is silenced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spec {
    pub kind: ResourceKind,
    pub fqn: Fqn,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub containers: Vec<String>,
    pub code: Option<Code>,
}

impl Spec {
    pub fn new(kind: impl Into<ResourceKind>, fqn: impl Into<Fqn>) -> Self {
        Self {
            kind: kind.into(),
            fqn: fqn.into(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            containers: Vec::new(),
            code: None,
        }
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_containers<I, S>(mut self, containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containers = containers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// A spec with nothing to match against. Such a spec is never excluded.
    pub fn is_empty(&self) -> bool {
        self.fqn.is_empty()
            && self.labels.is_empty()
            && self.annotations.is_empty()
            && self.containers.is_empty()
            && self.code.is_none()
    }
}
