//! Selector and reference-resolution helpers shared by every check.
//!
//! Two questions look alike and must not be confused: "which objects does
//! this selector select?" (an empty selector selects nothing, see
//! [`find_by_namespace_and_selector`]) and "which objects does this selector
//! cover?" (an empty selector covers everything, see
//! [`find_by_namespace_covering`]).

mod cidr;
mod error;
mod labels;
mod reference;

pub use cidr::{Cidr, matches_cidr, matches_cidr_except, parse_cidr};
pub use error::SelectorError;
pub use labels::{LabelSelector, LabelSelectorRequirement, Operator, match_labels, match_selector};
pub use reference::{
    OwnerLookup, find_by_namespace_and_selector, find_by_namespace_covering, find_namespaces, fqn,
    is_system_namespace, namespace_of, resolve_owner, split_fqn,
};
