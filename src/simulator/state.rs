use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{DisplayStatus, Progress, Verdict};

/// Mutable state of one run over one test case.
///
/// Every per-step vector has exactly one slot per step; the simulator checks
/// indices before touching them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionState {
    current_step: usize,
    step_status: Vec<Option<Verdict>>,
    captured_inputs: Vec<BTreeMap<String, String>>,
    execution_result: Vec<Option<String>>,
    notes: Vec<Option<String>>,
}

impl ExecutionState {
    pub fn new(step_count: usize) -> Self {
        Self {
            current_step: 0,
            step_status: vec![None; step_count],
            captured_inputs: vec![BTreeMap::new(); step_count],
            execution_result: vec![None; step_count],
            notes: vec![None; step_count],
        }
    }

    pub fn step_count(&self) -> usize {
        self.step_status.len()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn verdict(&self, index: usize) -> Option<Verdict> {
        self.step_status.get(index).copied().flatten()
    }

    pub fn inputs(&self, index: usize) -> Option<&BTreeMap<String, String>> {
        self.captured_inputs.get(index)
    }

    pub fn result(&self, index: usize) -> Option<&str> {
        self.execution_result.get(index)?.as_deref()
    }

    pub fn note(&self, index: usize) -> Option<&str> {
        self.notes.get(index)?.as_deref()
    }

    /// Derive the display status of a step. Nothing here is stored.
    pub fn display_status(&self, index: usize) -> DisplayStatus {
        match self.verdict(index) {
            Some(Verdict::Pass) => DisplayStatus::Passed,
            Some(Verdict::Fail) => DisplayStatus::Failed,
            None if index == self.current_step => DisplayStatus::Current,
            None if index < self.current_step => DisplayStatus::Skipped,
            None => DisplayStatus::Pending,
        }
    }

    pub fn progress(&self) -> Progress {
        let count = |v: Verdict| self.step_status.iter().filter(|s| **s == Some(v)).count();
        Progress {
            completed: count(Verdict::Pass),
            failed: count(Verdict::Fail),
            total: self.step_count(),
        }
    }

    /// First step before `index` whose verdict is not a pass.
    pub(crate) fn first_unpassed_before(&self, index: usize) -> Option<usize> {
        self.step_status[..index.min(self.step_status.len())]
            .iter()
            .position(|s| *s != Some(Verdict::Pass))
    }

    pub(crate) fn set_input(&mut self, index: usize, field: &str, value: String) {
        self.captured_inputs[index].insert(field.to_string(), value);
    }

    pub(crate) fn remove_input(&mut self, index: usize, field: &str) {
        self.captured_inputs[index].remove(field);
    }

    pub(crate) fn set_note(&mut self, index: usize, note: Option<String>) {
        self.notes[index] = note;
    }

    /// Store a verdict and its message, advancing the cursor when the current
    /// step passes. The cursor never moves backward.
    pub(crate) fn record_verdict(&mut self, index: usize, verdict: Verdict, message: String) {
        self.step_status[index] = Some(verdict);
        self.execution_result[index] = Some(message);

        if verdict == Verdict::Pass && index == self.current_step {
            let last = self.step_count().saturating_sub(1);
            self.current_step = (index + 1).min(last);
        }
    }
}
