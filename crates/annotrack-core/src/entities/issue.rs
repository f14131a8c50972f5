use serde::{Deserialize, Serialize};

use crate::errors::{AnnotrackError, AnnotrackResult};
use crate::models::RecordId;
use crate::traits::{Patch, Payload};

/// A problem report filed against a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub text: String,
    #[serde(default)]
    pub resolved: bool,
    pub problem_id: RecordId,
    pub creator_id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<RecordId>,
}

impl Patch for IssuePatch {
    fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.resolved.is_none()
            && self.problem_id.is_none()
            && self.creator_id.is_none()
    }
}

impl Payload for Issue {
    const KIND: &'static str = "issue";
    type Patch = IssuePatch;

    fn merge(&self, patch: &IssuePatch) -> Self {
        let mut next = self.clone();
        if let Some(text) = &patch.text {
            next.text = text.clone();
        }
        if let Some(resolved) = patch.resolved {
            next.resolved = resolved;
        }
        if let Some(problem_id) = patch.problem_id {
            next.problem_id = problem_id;
        }
        if let Some(creator_id) = patch.creator_id {
            next.creator_id = creator_id;
        }
        next
    }

    fn validate(&self) -> AnnotrackResult<()> {
        if self.text.trim().is_empty() {
            return Err(AnnotrackError::validation("issue text must not be empty"));
        }
        Ok(())
    }
}
