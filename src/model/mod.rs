//! Typed records held by the snapshot store.
//!
//! Every supported kind is a variant of [`Resource`]. Checks that know which
//! table they read ask for the concrete type through [`TypedRecord`] instead
//! of matching on the enum by hand.

mod meta;
mod network;
mod quantity;
mod rbac;
mod workload;

pub use meta::{ObjectMeta, OwnerReference};
pub use network::{IpBlock, NetworkPolicy, PolicyPeer, PolicyRule, Service};
pub use quantity::{QuantityError, parse_cpu_millis, parse_memory_bytes};
pub use rbac::{RoleBinding, RoleRef, ServiceAccount, Subject};
pub use workload::{
    Container, Deployment, Pod, PodTemplate, Probe, ReplicaSet, ResourceRequirements,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::registry::kinds;
use crate::types::{Fqn, ResourceKind};

/// Anything addressable by namespace and name.
pub trait Record {
    fn meta(&self) -> &ObjectMeta;

    fn namespace(&self) -> &str {
        &self.meta().namespace
    }

    fn name(&self) -> &str {
        &self.meta().name
    }

    fn labels(&self) -> &BTreeMap<String, String> {
        &self.meta().labels
    }

    fn annotations(&self) -> &BTreeMap<String, String> {
        &self.meta().annotations
    }

    fn fqn(&self) -> Fqn {
        self.meta().fqn()
    }
}

/// Objects of kinds the engine has no dedicated type for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResource {
    pub kind: ResourceKind,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Pod(Pod),
    Service(Service),
    Deployment(Deployment),
    ReplicaSet(ReplicaSet),
    NetworkPolicy(NetworkPolicy),
    Namespace(Namespace),
    ServiceAccount(ServiceAccount),
    RoleBinding(RoleBinding),
    ClusterRoleBinding(RoleBinding),
    Custom(CustomResource),
}

/// Namespaces carry nothing beyond their metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    pub metadata: ObjectMeta,
}

impl Resource {
    /// The table this record belongs in.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Pod(_) => ResourceKind::new(kinds::PODS),
            Resource::Service(_) => ResourceKind::new(kinds::SERVICES),
            Resource::Deployment(_) => ResourceKind::new(kinds::DEPLOYMENTS),
            Resource::ReplicaSet(_) => ResourceKind::new(kinds::REPLICA_SETS),
            Resource::NetworkPolicy(_) => ResourceKind::new(kinds::NETWORK_POLICIES),
            Resource::Namespace(_) => ResourceKind::new(kinds::NAMESPACES),
            Resource::ServiceAccount(_) => ResourceKind::new(kinds::SERVICE_ACCOUNTS),
            Resource::RoleBinding(_) => ResourceKind::new(kinds::ROLE_BINDINGS),
            Resource::ClusterRoleBinding(_) => ResourceKind::new(kinds::CLUSTER_ROLE_BINDINGS),
            Resource::Custom(c) => c.kind.clone(),
        }
    }

    /// Container names for suppression matching; empty for non-pod kinds.
    pub fn container_names(&self) -> Vec<String> {
        match self {
            Resource::Pod(pod) => pod.container_names(),
            Resource::Deployment(dp) => dp
                .template
                .containers
                .iter()
                .map(|c| c.name.clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Record for Resource {
    fn meta(&self) -> &ObjectMeta {
        match self {
            Resource::Pod(r) => &r.metadata,
            Resource::Service(r) => &r.metadata,
            Resource::Deployment(r) => &r.metadata,
            Resource::ReplicaSet(r) => &r.metadata,
            Resource::NetworkPolicy(r) => &r.metadata,
            Resource::Namespace(r) => &r.metadata,
            Resource::ServiceAccount(r) => &r.metadata,
            Resource::RoleBinding(r) | Resource::ClusterRoleBinding(r) => &r.metadata,
            Resource::Custom(r) => &r.metadata,
        }
    }
}

/// A concrete record type that can be borrowed back out of a [`Resource`].
pub trait TypedRecord: Record + Sized {
    fn from_resource(resource: &Resource) -> Option<&Self>;
}

/// Implements [`Record`], [`TypedRecord`] and `Into<Resource>` for a struct
/// with a `metadata` field held by a single enum variant.
macro_rules! impl_typed_record {
    ($ty:ty, $variant:ident) => {
        impl Record for $ty {
            fn meta(&self) -> &ObjectMeta {
                &self.metadata
            }
        }

        impl TypedRecord for $ty {
            fn from_resource(resource: &Resource) -> Option<&Self> {
                match resource {
                    Resource::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Resource {
            fn from(value: $ty) -> Self {
                Resource::$variant(value)
            }
        }
    };
}

impl_typed_record!(Pod, Pod);
impl_typed_record!(Service, Service);
impl_typed_record!(Deployment, Deployment);
impl_typed_record!(ReplicaSet, ReplicaSet);
impl_typed_record!(NetworkPolicy, NetworkPolicy);
impl_typed_record!(Namespace, Namespace);
impl_typed_record!(ServiceAccount, ServiceAccount);
impl_typed_record!(CustomResource, Custom);

impl Record for RoleBinding {
    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }
}

impl TypedRecord for RoleBinding {
    fn from_resource(resource: &Resource) -> Option<&Self> {
        match resource {
            Resource::RoleBinding(rb) | Resource::ClusterRoleBinding(rb) => Some(rb),
            _ => None,
        }
    }
}
