use serde::{Deserialize, Serialize};

use super::severity::Severity;
use crate::types::Code;

/// Group for findings about the object as a whole.
pub const ROOT_GROUP: &str = "__root__";

/// One issue raised against one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub group: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
}

impl Finding {
    pub fn new(code: Code, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            group: ROOT_GROUP.to_string(),
            severity,
            message: message.into(),
            code: Some(code),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.group == ROOT_GROUP
    }
}
