//! Compute workloads: pods and their controllers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::meta::ObjectMeta;
use crate::selector::LabelSelector;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pod {
    pub metadata: ObjectMeta,
    pub service_account_name: String,
    pub node_name: String,
    pub pod_ip: String,
    pub containers: Vec<Container>,
    pub init_containers: Vec<Container>,
}

impl Pod {
    pub fn new(metadata: ObjectMeta) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// Names of init and regular containers, init containers first.
    pub fn container_names(&self) -> Vec<String> {
        self.init_containers
            .iter()
            .chain(&self.containers)
            .map(|c| c.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    pub name: String,
    pub image: String,
    pub resources: ResourceRequirements,
    pub liveness_probe: Option<Probe>,
    pub readiness_probe: Option<Probe>,
}

impl Container {
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            ..Self::default()
        }
    }

    pub fn with_probes(mut self) -> Self {
        self.liveness_probe = Some(Probe::default());
        self.readiness_probe = Some(Probe::default());
        self
    }

    pub fn with_request(mut self, resource: &str, quantity: &str) -> Self {
        self.resources
            .requests
            .insert(resource.to_string(), quantity.to_string());
        self
    }

    pub fn with_limit(mut self, resource: &str, quantity: &str) -> Self {
        self.resources
            .limits
            .insert(resource.to_string(), quantity.to_string());
        self
    }

    /// The image tag, if any. Digest-pinned images report `None` and are
    /// handled by [`Container::is_digest_pinned`].
    pub fn image_tag(&self) -> Option<&str> {
        let image = self.image.split('@').next().unwrap_or_default();
        let last_segment = image.rsplit('/').next().unwrap_or_default();
        last_segment.split_once(':').map(|(_, tag)| tag)
    }

    pub fn is_digest_pinned(&self) -> bool {
        self.image.contains('@')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirements {
    pub requests: BTreeMap<String, String>,
    pub limits: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Probe {
    pub initial_delay_seconds: u32,
    pub period_seconds: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodTemplate {
    pub metadata: ObjectMeta,
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    pub metadata: ObjectMeta,
    pub replicas: u32,
    pub selector: LabelSelector,
    pub template: PodTemplate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplicaSet {
    pub metadata: ObjectMeta,
    pub replicas: u32,
    pub selector: LabelSelector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_tag() {
        assert_eq!(Container::new("c", "nginx:1.25").image_tag(), Some("1.25"));
        assert_eq!(Container::new("c", "nginx").image_tag(), None);
        assert_eq!(
            Container::new("c", "registry:5000/team/app:v2").image_tag(),
            Some("v2")
        );
        assert_eq!(Container::new("c", "registry:5000/team/app").image_tag(), None);
    }

    #[test]
    fn test_digest_pinned() {
        let c = Container::new("c", "nginx@sha256:abcd");
        assert!(c.is_digest_pinned());
        assert_eq!(c.image_tag(), None);
    }

    #[test]
    fn test_container_names_init_first() {
        let mut pod = Pod::new(ObjectMeta::new("default", "p1"))
            .with_container(Container::new("app", "app:1"));
        pod.init_containers.push(Container::new("init", "busybox:1"));
        assert_eq!(pod.container_names(), vec!["init", "app"]);
    }

    #[test]
    fn test_deserialize_pod_camel_case() {
        let pod: Pod = serde_json::from_str(
            r#"{
                "metadata": {"name": "p1", "namespace": "default", "labels": {"app": "a"}},
                "serviceAccountName": "builder",
                "containers": [{"name": "app", "image": "app:1", "livenessProbe": {}}]
            }"#,
        )
        .unwrap();
        assert_eq!(pod.service_account_name, "builder");
        assert!(pod.containers[0].liveness_probe.is_some());
        assert!(pod.containers[0].readiness_probe.is_none());
    }
}
