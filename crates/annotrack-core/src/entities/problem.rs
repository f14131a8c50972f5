use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AnnotrackError, AnnotrackResult};
use crate::models::RecordId;
use crate::traits::{Patch, Payload};

use super::nullable;

/// A model-generated solution split into numbered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub question: String,
    pub answer: String,
    pub llm_answer: String,
    pub steps: BTreeMap<u32, String>,
    pub num_steps: u32,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub solve_ratio: Option<f64>,
    #[serde(default)]
    pub llm_name: Option<String>,
    #[serde(default)]
    pub prompt_format: Option<String>,
    #[serde(default)]
    pub final_answer: Option<Value>,
    #[serde(default)]
    pub extra_metadata: Option<Value>,
    pub dataset_id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<BTreeMap<u32, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_steps: Option<u32>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<Option<bool>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub solve_ratio: Option<Option<f64>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub llm_name: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub prompt_format: Option<Option<String>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<Option<Value>>,
    #[serde(deserialize_with = "nullable::deserialize", skip_serializing_if = "Option::is_none")]
    pub extra_metadata: Option<Option<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<RecordId>,
}

impl Patch for ProblemPatch {
    fn is_empty(&self) -> bool {
        self.question.is_none()
            && self.answer.is_none()
            && self.llm_answer.is_none()
            && self.steps.is_none()
            && self.num_steps.is_none()
            && self.is_correct.is_none()
            && self.solve_ratio.is_none()
            && self.llm_name.is_none()
            && self.prompt_format.is_none()
            && self.final_answer.is_none()
            && self.extra_metadata.is_none()
            && self.dataset_id.is_none()
    }
}

impl Payload for Problem {
    const KIND: &'static str = "problem";
    type Patch = ProblemPatch;

    fn merge(&self, patch: &ProblemPatch) -> Self {
        let mut next = self.clone();
        if let Some(question) = &patch.question {
            next.question = question.clone();
        }
        if let Some(answer) = &patch.answer {
            next.answer = answer.clone();
        }
        if let Some(llm_answer) = &patch.llm_answer {
            next.llm_answer = llm_answer.clone();
        }
        if let Some(steps) = &patch.steps {
            next.steps = steps.clone();
        }
        if let Some(num_steps) = patch.num_steps {
            next.num_steps = num_steps;
        }
        if let Some(is_correct) = patch.is_correct {
            next.is_correct = is_correct;
        }
        if let Some(solve_ratio) = patch.solve_ratio {
            next.solve_ratio = solve_ratio;
        }
        if let Some(llm_name) = &patch.llm_name {
            next.llm_name = llm_name.clone();
        }
        if let Some(prompt_format) = &patch.prompt_format {
            next.prompt_format = prompt_format.clone();
        }
        if let Some(final_answer) = &patch.final_answer {
            next.final_answer = final_answer.clone();
        }
        if let Some(extra_metadata) = &patch.extra_metadata {
            next.extra_metadata = extra_metadata.clone();
        }
        if let Some(dataset_id) = patch.dataset_id {
            next.dataset_id = dataset_id;
        }
        next
    }

    fn validate(&self) -> AnnotrackResult<()> {
        if self.num_steps as usize != self.steps.len() {
            return Err(AnnotrackError::validation(format!(
                "num_steps is {} but {} steps were given",
                self.num_steps,
                self.steps.len()
            )));
        }
        if let Some(ratio) = self.solve_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(AnnotrackError::validation(format!(
                    "solve_ratio {ratio} outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}
