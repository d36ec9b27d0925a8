//! Identifier newtypes shared by every layer of the engine.
//!
//! Kinds, fully-qualified names and finding codes all travel as plain strings
//! or integers in configuration, so they get dedicated wrappers here to keep
//! them from being mixed up once inside the crate.

mod newtypes;

pub use newtypes::{Code, Fqn, ResourceKind};
