#[cfg(test)]
pub mod fixtures {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crate::exclusion::Exclusions;
    use crate::issues::{CodeGlossary, Collector};
    use crate::model::{Container, ObjectMeta, Pod, Resource};
    use crate::registry::KindRegistry;
    use crate::store::Store;
    use crate::types::ResourceKind;

    pub fn meta(namespace: &str, name: &str, labels: &[(&str, &str)]) -> ObjectMeta {
        labels
            .iter()
            .fold(ObjectMeta::new(namespace, name), |meta, (k, v)| {
                meta.with_label(k, v)
            })
    }

    /// A pod that raises no container findings.
    pub fn healthy_pod(namespace: &str, name: &str, labels: &[(&str, &str)]) -> Pod {
        let mut pod = Pod::new(meta(namespace, name, labels)).with_container(
            Container::new("app", "registry.local/app:1.2.3")
                .with_probes()
                .with_request("cpu", "100m")
                .with_limit("cpu", "200m")
                .with_request("memory", "64Mi")
                .with_limit("memory", "128Mi"),
        );
        pod.service_account_name = "app".to_string();
        pod
    }

    /// A store over the builtin registry with every given record loaded,
    /// grouped by kind.
    pub fn store_with(records: Vec<Resource>) -> Store {
        let store = Store::new(Arc::new(KindRegistry::builtin()));
        let mut by_kind: BTreeMap<ResourceKind, Vec<Resource>> = BTreeMap::new();
        for record in records {
            by_kind.entry(record.kind()).or_default().push(record);
        }
        for (kind, batch) in by_kind {
            store.load(&kind, batch).expect("fixture load");
        }
        store
    }

    pub fn collector(kind: &str) -> Collector {
        collector_with(kind, Exclusions::new())
    }

    pub fn collector_with(kind: &str, exclusions: Exclusions) -> Collector {
        Collector::new(
            kind,
            Arc::new(CodeGlossary::builtin()),
            Arc::new(exclusions),
        )
    }

    /// Codes recorded against `fqn`, in call order.
    pub fn codes_for(collector: &Collector, fqn: &str) -> Vec<u32> {
        collector
            .outcome()
            .get(fqn)
            .unwrap_or_default()
            .iter()
            .filter_map(|f| f.code.map(|c| c.value()))
            .collect()
    }
}
