use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status::{CaseStatus, Priority};

/// A test case definition. Read-only once it leaves the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub created: Option<NaiveDate>,
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl TestCase {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Give every step without an explicit number its 1-based position.
    pub fn number_steps(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            if step.number == 0 {
                step.number = i + 1;
            }
        }
    }

    /// First step number used by more than one step.
    pub fn duplicate_step_number(&self) -> Option<usize> {
        let mut seen = HashSet::new();
        self.steps
            .iter()
            .map(|s| s.number)
            .find(|n| !seen.insert(*n))
    }

    /// Case-insensitive substring match over id, title and description.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.id.to_lowercase().contains(&query)
            || self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, rename = "step")]
    pub number: usize,
    pub action: String,
    /// Free-form description of the test data to use.
    #[serde(default)]
    pub data: Option<String>,
    pub expected: String,
    #[serde(default)]
    pub inputs: Vec<InputField>,
    #[serde(default)]
    pub rule: StepRule,
}

impl Step {
    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub kind: ValueKind,
    #[serde(default)]
    pub required: bool,
}

/// Hint for how a captured string is interpreted at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Text,
    Number,
}

/// Evaluation policy for a step.
///
/// Every rule except `DataEntry` on the first step gates on all earlier steps
/// having passed before it looks at anything else.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepRule {
    /// Validate the step's own captured inputs.
    DataEntry,
    /// Report `message` once the previous steps have passed.
    Submit { message: String },
    /// Generate `PREFIX-YYYYMMDD-NNNNNN` and store it under `field`.
    CaptureIdentifier { prefix: String, field: String },
    /// Report a fixed status once the previous steps have passed.
    StatusCheck { status: String },
    /// Tester attests the step.
    #[default]
    Manual,
}
