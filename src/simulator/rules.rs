use chrono::{Local, NaiveDate};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::models::{ExecutionOutcome, Step, StepRule, TestCase, ValueKind};

use super::state::ExecutionState;

pub const VALIDATION_FAILED: &str =
    "Validation failed: all required fields must be filled and the amount must be greater than zero";
pub const PREVIOUS_STEP_FAILED: &str = "Previous step failed";
pub const STEP_CONFIRMED: &str = "Step confirmed";

/// Produces identifiers of the form `PREFIX-YYYYMMDD-NNNNNN`.
#[derive(Debug, Clone)]
pub struct IdentifierSource {
    rng: StdRng,
    date: Option<NaiveDate>,
}

impl IdentifierSource {
    /// Entropy-seeded, dated with the local calendar day.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            date: None,
        }
    }

    /// Deterministic source pinned to a single date.
    pub fn fixed(seed: u64, date: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            date: Some(date),
        }
    }

    pub fn generate(&mut self, prefix: &str) -> String {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let suffix: u32 = self.rng.gen_range(0..1_000_000);
        format!("{}-{}-{:06}", prefix, date.format("%Y%m%d"), suffix)
    }
}

impl Default for IdentifierSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of evaluating a rule, plus a value the rule wants written back
/// into the step's captured inputs.
#[derive(Debug)]
pub(crate) struct Evaluation {
    pub outcome: ExecutionOutcome,
    pub capture: Option<(String, String)>,
}

impl From<ExecutionOutcome> for Evaluation {
    fn from(outcome: ExecutionOutcome) -> Self {
        Self {
            outcome,
            capture: None,
        }
    }
}

pub(crate) fn evaluate(
    case: &TestCase,
    state: &ExecutionState,
    index: usize,
    ids: &mut IdentifierSource,
) -> Evaluation {
    if let Some(blocking) = state.first_unpassed_before(index) {
        return gate_failure(case, index, blocking).into();
    }

    let step = &case.steps[index];
    match &step.rule {
        StepRule::DataEntry => validate_inputs(step, state, index).into(),

        StepRule::Submit { message } => ExecutionOutcome::pass(message.clone()).into(),

        StepRule::CaptureIdentifier { prefix, field } => {
            let id = ids.generate(prefix);
            Evaluation {
                outcome: ExecutionOutcome::pass(format!("Identifier captured: {}", id)),
                capture: Some((field.clone(), id)),
            }
        }

        StepRule::StatusCheck { status } => {
            ExecutionOutcome::pass(format!("Payment status: {}", status)).into()
        }

        StepRule::Manual => ExecutionOutcome::pass(STEP_CONFIRMED).into(),
    }
}

fn gate_failure(case: &TestCase, index: usize, blocking: usize) -> ExecutionOutcome {
    if blocking + 1 == index {
        ExecutionOutcome::fail(PREVIOUS_STEP_FAILED)
    } else {
        ExecutionOutcome::fail(format!(
            "Step {} has not passed",
            case.steps[blocking].number
        ))
    }
}

fn validate_inputs(step: &Step, state: &ExecutionState, index: usize) -> ExecutionOutcome {
    let captured = state.inputs(index);
    let value_of = |name: &str| {
        captured
            .and_then(|m| m.get(name))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    for field in &step.inputs {
        let value = value_of(&field.name);
        if field.required && value.is_none() {
            return ExecutionOutcome::fail(VALIDATION_FAILED);
        }
        if field.kind == ValueKind::Number
            && let Some(raw) = value
            && !parse_positive(raw)
        {
            return ExecutionOutcome::fail(VALIDATION_FAILED);
        }
    }

    let echoed: Vec<String> = step
        .inputs
        .iter()
        .filter_map(|f| value_of(&f.name).map(|v| format!("{}: {}", f.label, v)))
        .collect();

    if echoed.is_empty() {
        ExecutionOutcome::pass("Validated")
    } else {
        ExecutionOutcome::pass(format!("Validated {}", echoed.join(", ")))
    }
}

/// Accepts `250`, `250.00`, `$1,250.00`. Rejects zero, negatives, NaN and inf.
fn parse_positive(raw: &str) -> bool {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n > 0.0)
}
