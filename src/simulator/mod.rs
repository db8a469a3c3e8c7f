//! Step-by-step execution of a single test case.
//!
//! A [`StepExecutionSimulator`] owns the [`ExecutionState`] of one run. The
//! presentation layer reads it and forwards user actions into the mutating
//! operations; nothing else writes to the state.

mod rules;
mod state;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::SimulatorError;
use crate::models::{DisplayStatus, ExecutionOutcome, Progress, StepRule, TestCase, Verdict};

pub use rules::{IdentifierSource, PREVIOUS_STEP_FAILED, STEP_CONFIRMED, VALIDATION_FAILED};
pub use state::ExecutionState;

pub type Result<T> = std::result::Result<T, SimulatorError>;

#[derive(Debug, Clone)]
pub struct StepExecutionSimulator {
    case: TestCase,
    state: ExecutionState,
    ids: IdentifierSource,
}

impl StepExecutionSimulator {
    pub fn new(case: TestCase) -> Result<Self> {
        Self::with_identifiers(case, IdentifierSource::new())
    }

    pub fn with_identifiers(case: TestCase, ids: IdentifierSource) -> Result<Self> {
        if case.steps.is_empty() {
            return Err(SimulatorError::EmptyCase(case.id));
        }
        info!(case = %case.id, steps = case.step_count(), "starting run");
        let state = ExecutionState::new(case.step_count());
        Ok(Self { case, state, ids })
    }

    pub fn case(&self) -> &TestCase {
        &self.case
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step()
    }

    pub fn step_count(&self) -> usize {
        self.case.step_count()
    }

    /// Store a raw input value. Validation happens when the step executes.
    pub fn record_input(&mut self, step: usize, field: &str, value: impl Into<String>) -> Result<()> {
        self.check(step)?;
        if self.case.steps[step].field(field).is_none() {
            debug!(step, field, "storing value for undeclared field");
        }
        self.state.set_input(step, field, value.into());
        Ok(())
    }

    /// Evaluate the step's rule against captured inputs and earlier verdicts.
    ///
    /// Re-executing a step overwrites its previous verdict but never touches
    /// later steps or moves the cursor backward. A failed capture drops the
    /// identifier an earlier pass stored.
    pub fn execute_step(&mut self, step: usize) -> Result<ExecutionOutcome> {
        self.check(step)?;
        let evaluation = rules::evaluate(&self.case, &self.state, step, &mut self.ids);

        let outcome = evaluation.outcome;
        if let Some((field, value)) = evaluation.capture {
            self.state.set_input(step, &field, value);
        } else if !outcome.passed() {
            self.drop_capture(step);
        }

        self.state
            .record_verdict(step, outcome.verdict, outcome.message.clone());

        info!(
            case = %self.case.id,
            step,
            verdict = ?outcome.verdict,
            cursor = self.state.current_step(),
            "step executed"
        );
        Ok(outcome)
    }

    /// Record a verdict given by the tester instead of a rule.
    ///
    /// A manual pass is refused while any earlier step has not passed.
    pub fn mark_step(&mut self, step: usize, verdict: Verdict) -> Result<ExecutionOutcome> {
        self.check(step)?;

        let outcome = match verdict {
            Verdict::Pass => {
                if let Some(blocking) = self.state.first_unpassed_before(step) {
                    warn!(case = %self.case.id, step, blocking, "manual pass refused");
                    return Err(SimulatorError::PrerequisitesNotMet { step, blocking });
                }
                ExecutionOutcome::pass("Marked as passed")
            }
            Verdict::Fail => {
                self.drop_capture(step);
                ExecutionOutcome::fail("Marked as failed")
            }
        };

        self.state
            .record_verdict(step, outcome.verdict, outcome.message.clone());
        info!(case = %self.case.id, step, verdict = ?verdict, "step marked");
        Ok(outcome)
    }

    fn drop_capture(&mut self, step: usize) {
        if let StepRule::CaptureIdentifier { field, .. } = &self.case.steps[step].rule {
            self.state.remove_input(step, field);
        }
    }

    /// Attach failure notes to a step. Blank text clears the note.
    pub fn record_note(&mut self, step: usize, text: &str) -> Result<()> {
        self.check(step)?;
        let text = text.trim();
        let note = (!text.is_empty()).then(|| text.to_string());
        self.state.set_note(step, note);
        Ok(())
    }

    pub fn status_of(&self, step: usize) -> Result<DisplayStatus> {
        self.check(step)?;
        Ok(self.state.display_status(step))
    }

    pub fn progress(&self) -> Progress {
        self.state.progress()
    }

    pub fn verdict(&self, step: usize) -> Result<Option<Verdict>> {
        self.check(step)?;
        Ok(self.state.verdict(step))
    }

    pub fn inputs(&self, step: usize) -> Result<&BTreeMap<String, String>> {
        self.check(step)?;
        self.state
            .inputs(step)
            .ok_or(SimulatorError::StepOutOfRange {
                index: step,
                count: self.step_count(),
            })
    }

    pub fn input(&self, step: usize, field: &str) -> Result<Option<&str>> {
        Ok(self.inputs(step)?.get(field).map(String::as_str))
    }

    pub fn result(&self, step: usize) -> Result<Option<&str>> {
        self.check(step)?;
        Ok(self.state.result(step))
    }

    pub fn note(&self, step: usize) -> Result<Option<&str>> {
        self.check(step)?;
        Ok(self.state.note(step))
    }

    /// Throw away the current run and start over on the same case.
    pub fn restart(&mut self) {
        info!(case = %self.case.id, "restarting run");
        self.state = ExecutionState::new(self.case.step_count());
    }

    fn check(&self, step: usize) -> Result<()> {
        let count = self.step_count();
        if step < count {
            Ok(())
        } else {
            Err(SimulatorError::StepOutOfRange { index: step, count })
        }
    }
}
