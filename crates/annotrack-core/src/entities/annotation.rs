use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::RecordId;
use crate::traits::{Patch, Payload};

/// A user's per-step labels for one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub step_labels: BTreeMap<u32, String>,
    /// Every step is labeled.
    #[serde(default)]
    pub complete: bool,
    pub problem_id: RecordId,
    pub creator_id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_labels: Option<BTreeMap<u32, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<RecordId>,
}

impl Patch for AnnotationPatch {
    fn is_empty(&self) -> bool {
        self.step_labels.is_none()
            && self.complete.is_none()
            && self.problem_id.is_none()
            && self.creator_id.is_none()
    }
}

impl Payload for Annotation {
    const KIND: &'static str = "annotation";
    type Patch = AnnotationPatch;

    fn merge(&self, patch: &AnnotationPatch) -> Self {
        let mut next = self.clone();
        if let Some(step_labels) = &patch.step_labels {
            next.step_labels = step_labels.clone();
        }
        if let Some(complete) = patch.complete {
            next.complete = complete;
        }
        if let Some(problem_id) = patch.problem_id {
            next.problem_id = problem_id;
        }
        if let Some(creator_id) = patch.creator_id {
            next.creator_id = creator_id;
        }
        next
    }
}
