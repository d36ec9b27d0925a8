//! Services and network policies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::meta::ObjectMeta;
use crate::selector::{LabelSelector, SelectorError, parse_cidr};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub metadata: ObjectMeta,
    /// `ClusterIP`, `NodePort`, `LoadBalancer` or `ExternalName`.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Plain equality selector, no match expressions.
    pub selector: BTreeMap<String, String>,
    pub cluster_ip: String,
}

impl Service {
    pub fn new(metadata: ObjectMeta) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn with_selector(mut self, key: &str, value: &str) -> Self {
        self.selector.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_external_name(&self) -> bool {
        self.service_type == "ExternalName"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkPolicy {
    pub metadata: ObjectMeta,
    pub pod_selector: LabelSelector,
    pub ingress: Vec<PolicyRule>,
    pub egress: Vec<PolicyRule>,
}

impl NetworkPolicy {
    pub fn new(metadata: ObjectMeta) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }
}

/// An ingress `from` or egress `to` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyRule {
    pub peers: Vec<PolicyPeer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyPeer {
    pub pod_selector: Option<LabelSelector>,
    pub namespace_selector: Option<LabelSelector>,
    pub ip_block: Option<IpBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpBlock {
    pub cidr: String,
    pub except: Vec<String>,
}

impl IpBlock {
    pub fn new(cidr: &str) -> Self {
        Self {
            cidr: cidr.to_string(),
            except: Vec::new(),
        }
    }

    pub fn with_except(mut self, cidr: &str) -> Self {
        self.except.push(cidr.to_string());
        self
    }

    /// The block and every exception must parse, and each exception must
    /// lie inside the block.
    pub fn validate(&self) -> Result<(), SelectorError> {
        let block = parse_cidr(&self.cidr)?;
        for raw in &self.except {
            let except = parse_cidr(raw)?;
            if !block.contains_cidr(&except) {
                return Err(SelectorError::ExceptOutsideBlock {
                    except: raw.clone(),
                    cidr: self.cidr.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_block_validate() {
        assert!(IpBlock::new("10.0.0.0/8").with_except("10.1.0.0/16").validate().is_ok());
        assert!(matches!(
            IpBlock::new("10.0.0.0/8").with_except("192.168.0.0/16").validate(),
            Err(SelectorError::ExceptOutsideBlock { .. })
        ));
        assert!(matches!(
            IpBlock::new("10.0.0.0").validate(),
            Err(SelectorError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn test_service_type_field_renamed() {
        let svc: Service = serde_json::from_str(
            r#"{"metadata": {"name": "s", "namespace": "ns"}, "type": "ExternalName"}"#,
        )
        .unwrap();
        assert!(svc.is_external_name());
    }
}
