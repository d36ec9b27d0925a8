//! NewType wrappers for kind names, FQNs and finding codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a tracked object type (e.g. "pods", "networkpolicies").
///
/// One kind maps to exactly one store table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKind(String);

impl ResourceKind {
    /// Create a new ResourceKind from any string-like type.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the underlying string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for ResourceKind {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ResourceKind {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ResourceKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully-qualified name: `namespace/name`, or a bare `name` for
/// cluster-scoped objects.
///
/// Ordering is plain string ordering, which is the primary-key order of a
/// store table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fqn(String);

impl Fqn {
    /// Create a new Fqn from an already-joined string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Join a namespace and a name. An empty namespace yields a bare name.
    pub fn from_parts(namespace: &str, name: &str) -> Self {
        if namespace.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{namespace}/{name}"))
        }
    }

    /// Split into `(namespace, name)`. Cluster-scoped names have an empty
    /// namespace.
    pub fn parts(&self) -> (&str, &str) {
        match self.0.split_once('/') {
            Some((ns, name)) => (ns, name),
            None => ("", &self.0),
        }
    }

    pub fn namespace(&self) -> &str {
        self.parts().0
    }

    pub fn name(&self) -> &str {
        self.parts().1
    }

    pub fn is_cluster_scoped(&self) -> bool {
        !self.0.contains('/')
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the underlying string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Fqn {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Fqn {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Fqn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Fqn {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric finding code (e.g. 100, 1102).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(u32);

impl Code {
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Code {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqn_from_parts_namespaced() {
        let fqn = Fqn::from_parts("default", "p1");
        assert_eq!(fqn.as_str(), "default/p1");
        assert_eq!(fqn.parts(), ("default", "p1"));
        assert!(!fqn.is_cluster_scoped());
    }

    #[test]
    fn test_fqn_from_parts_cluster_scoped() {
        let fqn = Fqn::from_parts("", "node-1");
        assert_eq!(fqn.as_str(), "node-1");
        assert_eq!(fqn.namespace(), "");
        assert_eq!(fqn.name(), "node-1");
        assert!(fqn.is_cluster_scoped());
    }

    #[test]
    fn test_fqn_ordering_is_string_ordering() {
        let mut fqns = vec![Fqn::from("ns/b"), Fqn::from("a"), Fqn::from("ns/a")];
        fqns.sort();
        assert_eq!(fqns, vec![Fqn::from("a"), Fqn::from("ns/a"), Fqn::from("ns/b")]);
    }

    #[test]
    fn test_resource_kind_display() {
        let kind = ResourceKind::new("pods");
        assert_eq!(format!("{}", kind), "pods");
        assert_eq!(kind.into_inner(), "pods");
    }

    #[test]
    fn test_code_display_and_value() {
        let code = Code::new(1102);
        assert_eq!(code.to_string(), "1102");
        assert_eq!(code.value(), 1102);
        assert_eq!(Code::from(7), Code::new(7));
    }

    #[test]
    fn test_code_serde_transparent() {
        let json = serde_json::to_string(&Code::new(300)).unwrap();
        assert_eq!(json, "300");
        let fqn: Fqn = serde_json::from_str("\"default/p1\"").unwrap();
        assert_eq!(fqn, Fqn::from("default/p1"));
    }
}
