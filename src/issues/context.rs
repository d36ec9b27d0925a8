use std::collections::BTreeMap;

use crate::exclusion::Spec;
use crate::model::{Record, Resource};
use crate::types::{Code, Fqn, ResourceKind};

/// What a check knows about the object it is currently reporting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingContext {
    pub kind: ResourceKind,
    pub fqn: Fqn,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub containers: Vec<String>,
}

impl FindingContext {
    pub fn new(kind: impl Into<ResourceKind>, fqn: impl Into<Fqn>) -> Self {
        Self {
            kind: kind.into(),
            fqn: fqn.into(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            containers: Vec::new(),
        }
    }

    /// Context for any record, without container names.
    pub fn from_record<R: Record>(kind: &ResourceKind, record: &R) -> Self {
        Self {
            kind: kind.clone(),
            fqn: record.fqn(),
            labels: record.labels().clone(),
            annotations: record.annotations().clone(),
            containers: Vec::new(),
        }
    }

    /// Context for a stored resource, including its container names.
    pub fn for_resource(resource: &Resource) -> Self {
        let mut ctx = Self::from_record(&resource.kind(), resource);
        ctx.containers = resource.container_names();
        ctx
    }

    pub fn with_containers<I, S>(mut self, containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containers = containers.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn spec(&self, code: Code) -> Spec {
        Spec::new(self.kind.clone(), self.fqn.clone())
            .with_labels(self.labels.clone())
            .with_annotations(self.annotations.clone())
            .with_containers(self.containers.iter().cloned())
            .with_code(code)
    }
}
