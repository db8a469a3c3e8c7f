pub mod case;
pub mod result;
pub mod status;

pub use case::{InputField, Step, StepRule, TestCase, ValueKind};
pub use result::{ExecutionOutcome, Progress};
pub use status::{CaseStatus, DisplayStatus, Priority, Verdict};
