//! A single suppression rule and its two matching modes.

use serde::Serialize;
use std::collections::BTreeMap;

use super::error::ExclusionError;
use super::expression::Expressions;
use super::spec::Spec;

/// One suppression rule. Every category is optional; an empty category
/// takes no part in matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Exclude {
    pub fqns: Expressions,
    pub labels: BTreeMap<String, Expressions>,
    pub annotations: BTreeMap<String, Expressions>,
    pub containers: Expressions,
    pub codes: Expressions,
}

impl Exclude {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fqns<I, S>(mut self, raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fqns = Expressions::parse(raw)?;
        Ok(self)
    }

    pub fn with_labels<I, S>(mut self, key: &str, raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.labels.insert(key.to_string(), Expressions::parse(raw)?);
        Ok(self)
    }

    pub fn with_annotations<I, S>(mut self, key: &str, raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.annotations
            .insert(key.to_string(), Expressions::parse(raw)?);
        Ok(self)
    }

    pub fn with_containers<I, S>(mut self, raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.containers = Expressions::parse(raw)?;
        Ok(self)
    }

    pub fn with_codes<I, S>(mut self, raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.codes = Expressions::parse(raw)?;
        Ok(self)
    }

    /// A rule without any filter. Such a rule never matches.
    pub fn is_empty(&self) -> bool {
        self.fqns.is_empty()
            && self.labels.is_empty()
            && self.annotations.is_empty()
            && self.containers.is_empty()
            && self.codes.is_empty()
    }

    /// Glob mode: any present category matching is enough.
    pub fn match_glob(&self, spec: &Spec) -> bool {
        if self.is_empty() || spec.is_empty() {
            return false;
        }

        (!self.fqns.is_empty() && self.match_fqn(spec))
            || (!self.labels.is_empty() && match_map(&self.labels, &spec.labels))
            || (!self.annotations.is_empty() && match_map(&self.annotations, &spec.annotations))
            || (!self.containers.is_empty() && self.match_containers(spec))
            || (!self.codes.is_empty() && self.match_code(spec))
    }

    /// Strict mode: every present category must match.
    pub fn match_strict(&self, spec: &Spec) -> bool {
        if self.is_empty() || spec.is_empty() {
            return false;
        }

        (self.fqns.is_empty() || self.match_fqn(spec))
            && (self.labels.is_empty() || match_map(&self.labels, &spec.labels))
            && (self.annotations.is_empty() || match_map(&self.annotations, &spec.annotations))
            && (self.containers.is_empty() || self.match_containers(spec))
            && (self.codes.is_empty() || self.match_code(spec))
    }

    fn match_fqn(&self, spec: &Spec) -> bool {
        !spec.fqn.is_empty() && self.fqns.matches(spec.fqn.as_str())
    }

    fn match_containers(&self, spec: &Spec) -> bool {
        self.containers
            .matches_any(spec.containers.iter().map(String::as_str))
    }

    fn match_code(&self, spec: &Spec) -> bool {
        spec.code
            .is_some_and(|code| self.codes.matches(&code.to_string()))
    }
}

/// At least one rule key must be present on the object with a value the
/// key's expressions accept.
fn match_map(rule: &BTreeMap<String, Expressions>, values: &BTreeMap<String, String>) -> bool {
    rule.iter().any(|(key, exprs)| {
        values
            .get(key)
            .is_some_and(|value| exprs.matches(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_spec() -> Spec {
        Spec::new("pods", "ns/x").with_label("tier", "web")
    }

    #[test]
    fn test_label_rule_matches_in_both_modes() {
        let rule = Exclude::new().with_labels("tier", ["web"]).unwrap();
        assert!(rule.match_glob(&web_spec()));
        assert!(rule.match_strict(&web_spec()));
    }

    #[test]
    fn test_unmatched_fqn_splits_glob_and_strict() {
        let rule = Exclude::new()
            .with_labels("tier", ["web"])
            .unwrap()
            .with_fqns(["other-ns"])
            .unwrap();

        assert!(rule.match_glob(&web_spec()));
        assert!(!rule.match_strict(&web_spec()));
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let rule = Exclude::new();
        assert!(rule.is_empty());
        assert!(!rule.match_glob(&web_spec()));
        assert!(!rule.match_strict(&web_spec()));
    }

    #[test]
    fn test_empty_spec_never_matches() {
        let rule = Exclude::new().with_fqns(["rx:.*"]).unwrap();
        let spec = Spec::new("pods", "");
        assert!(!rule.match_glob(&spec));
        assert!(!rule.match_strict(&spec));
    }

    #[test]
    fn test_fqn_regex() {
        let rule = Exclude::new().with_fqns(["rx:^kube-system/"]).unwrap();
        assert!(rule.match_glob(&Spec::new("pods", "kube-system/coredns")));
        assert!(!rule.match_glob(&Spec::new("pods", "default/coredns")));
    }

    #[test]
    fn test_label_key_missing_on_object() {
        let rule = Exclude::new().with_labels("app", ["rx:.*"]).unwrap();
        assert!(!rule.match_glob(&web_spec()));
        assert!(!rule.match_strict(&web_spec()));
    }

    #[test]
    fn test_any_label_key_is_enough() {
        let rule = Exclude::new()
            .with_labels("app", ["nginx"])
            .unwrap()
            .with_labels("tier", ["web"])
            .unwrap();
        assert!(rule.match_strict(&web_spec()));
    }

    #[test]
    fn test_annotations() {
        let rule = Exclude::new()
            .with_annotations("owner", ["rx:^team-"])
            .unwrap();
        let spec = Spec::new("pods", "ns/x").with_annotation("owner", "team-core");
        assert!(rule.match_glob(&spec));
        assert!(!rule.match_glob(&web_spec()));
    }

    #[test]
    fn test_containers_any_container() {
        let rule = Exclude::new().with_containers(["istio-proxy"]).unwrap();
        let spec = Spec::new("pods", "ns/x").with_containers(["app", "istio-proxy"]);
        assert!(rule.match_glob(&spec));
        assert!(rule.match_strict(&spec));
        let spec = Spec::new("pods", "ns/x").with_containers(["app"]);
        assert!(!rule.match_strict(&spec));
    }

    #[test]
    fn test_codes_against_numeric_code() {
        let rule = Exclude::new().with_codes(["rx:^10"]).unwrap();
        assert!(rule.match_glob(&Spec::new("pods", "ns/x").with_code(102u32)));
        assert!(!rule.match_glob(&Spec::new("pods", "ns/x").with_code(300u32)));
        assert!(!rule.match_glob(&Spec::new("pods", "ns/x")));
    }

    #[test]
    fn test_strict_requires_code_and_fqn() {
        let rule = Exclude::new()
            .with_fqns(["ns/x"])
            .unwrap()
            .with_codes(["300"])
            .unwrap();
        assert!(rule.match_strict(&Spec::new("pods", "ns/x").with_code(300u32)));
        assert!(!rule.match_strict(&Spec::new("pods", "ns/x").with_code(301u32)));
        assert!(!rule.match_strict(&Spec::new("pods", "ns/y").with_code(300u32)));
        assert!(rule.match_glob(&Spec::new("pods", "ns/y").with_code(300u32)));
    }
}
