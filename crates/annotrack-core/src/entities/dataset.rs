use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AnnotrackError, AnnotrackResult};
use crate::models::RecordId;
use crate::traits::{Patch, Payload};

use super::nullable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub description: String,
    /// math, coding, agentic, ...
    pub domain: String,
    #[serde(default)]
    pub extra_metadata: Option<Value>,
    #[serde(default)]
    pub creator_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_metadata: Option<Option<Value>>,
    #[serde(
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub creator_id: Option<Option<RecordId>>,
}

impl Patch for DatasetPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.domain.is_none()
            && self.extra_metadata.is_none()
            && self.creator_id.is_none()
    }
}

impl Payload for Dataset {
    const KIND: &'static str = "dataset";
    type Patch = DatasetPatch;

    fn merge(&self, patch: &DatasetPatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(domain) = &patch.domain {
            next.domain = domain.clone();
        }
        if let Some(extra_metadata) = &patch.extra_metadata {
            next.extra_metadata = extra_metadata.clone();
        }
        if let Some(creator_id) = patch.creator_id {
            next.creator_id = creator_id;
        }
        next
    }

    fn validate(&self) -> AnnotrackResult<()> {
        if self.name.trim().is_empty() {
            return Err(AnnotrackError::validation("dataset name must not be empty"));
        }
        Ok(())
    }
}
