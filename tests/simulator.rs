use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use casebook::models::{DisplayStatus, Progress, TestCase, Verdict};
use casebook::simulator::{PREVIOUS_STEP_FAILED, STEP_CONFIRMED, VALIDATION_FAILED};
use casebook::{Catalog, IdentifierSource, StepExecutionSimulator};

fn ach_case() -> TestCase {
    Catalog::builtin()
        .get("TC-001")
        .cloned()
        .expect("TC-001 is built in")
}

fn simulator() -> StepExecutionSimulator {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    StepExecutionSimulator::with_identifiers(ach_case(), IdentifierSource::fixed(1234, date))
        .unwrap()
}

fn enter_payment(sim: &mut StepExecutionSimulator, amount: &str) {
    sim.record_input(0, "amount", amount).unwrap();
    sim.record_input(0, "fromAccount", "Checking (****1234)").unwrap();
    sim.record_input(0, "toAccount", "Savings (****5678)").unwrap();
}

fn statuses(sim: &StepExecutionSimulator) -> Vec<DisplayStatus> {
    (0..sim.step_count())
        .map(|i| sim.status_of(i).unwrap())
        .collect()
}

#[test]
fn only_first_step_is_current_before_execution() {
    let sim = simulator();
    assert_eq!(
        statuses(&sim),
        vec![
            DisplayStatus::Current,
            DisplayStatus::Pending,
            DisplayStatus::Pending,
            DisplayStatus::Pending,
        ]
    );
    assert_eq!(
        sim.progress(),
        Progress {
            completed: 0,
            failed: 0,
            total: 4
        }
    );
}

#[test]
fn valid_payment_details_pass_and_advance() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250.00");

    let outcome = sim.execute_step(0).unwrap();
    assert_eq!(outcome.verdict, Verdict::Pass);
    assert!(outcome.message.contains("250.00"), "{}", outcome.message);
    assert!(outcome.message.contains("Checking (****1234)"));
    assert_eq!(sim.current_step(), 1);
    assert_eq!(sim.status_of(0).unwrap(), DisplayStatus::Passed);
    assert_eq!(sim.status_of(1).unwrap(), DisplayStatus::Current);
    assert_eq!(sim.result(0).unwrap(), Some(outcome.message.as_str()));
}

#[test]
fn zero_amount_fails_without_advancing() {
    let mut sim = simulator();
    enter_payment(&mut sim, "0");

    let outcome = sim.execute_step(0).unwrap();
    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(outcome.message, VALIDATION_FAILED);
    assert_eq!(sim.current_step(), 0);
    assert_eq!(sim.status_of(0).unwrap(), DisplayStatus::Failed);
}

#[test]
fn missing_source_account_fails() {
    let mut sim = simulator();
    sim.record_input(0, "amount", "250").unwrap();
    sim.record_input(0, "toAccount", "Savings").unwrap();

    let outcome = sim.execute_step(0).unwrap();
    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(sim.current_step(), 0);
}

#[test]
fn blank_required_field_counts_as_missing() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    sim.record_input(0, "fromAccount", "   ").unwrap();
    assert_eq!(sim.execute_step(0).unwrap().verdict, Verdict::Fail);
}

#[test]
fn submission_fails_unless_data_entry_passed() {
    let mut sim = simulator();
    sim.record_input(1, "anything", "ignored").unwrap();
    assert_eq!(sim.execute_step(1).unwrap().verdict, Verdict::Fail);

    enter_payment(&mut sim, "-3");
    sim.execute_step(0).unwrap();
    let outcome = sim.execute_step(1).unwrap();
    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(outcome.message, PREVIOUS_STEP_FAILED);
    assert_eq!(sim.current_step(), 0);
}

#[test]
fn identifier_is_captured_under_reserved_field() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    sim.execute_step(0).unwrap();
    sim.execute_step(1).unwrap();

    let outcome = sim.execute_step(2).unwrap();
    assert_eq!(outcome.verdict, Verdict::Pass);

    let id = sim.input(2, "paymentId").unwrap().unwrap().to_string();
    let parts: Vec<&str> = id.split('-').collect();
    assert_eq!(parts.len(), 4, "{}", id);
    assert_eq!(&parts[..3], &["PAY", "ACH", "20240115"]);
    assert!(!parts[3].is_empty() && parts[3].chars().all(|c| c.is_ascii_digit()));
    assert!(outcome.message.contains(&id));
}

#[test]
fn full_run_reports_entered_status() {
    let mut sim = simulator();
    enter_payment(&mut sim, "$1,250.00");
    for step in 0..4 {
        assert_eq!(sim.execute_step(step).unwrap().verdict, Verdict::Pass);
    }
    assert_eq!(sim.result(3).unwrap(), Some("Payment status: Entered"));
    assert_eq!(sim.current_step(), 3);
    assert_eq!(sim.progress().completed, 4);
}

#[test]
fn progress_counts_passes_and_failures() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    sim.execute_step(0).unwrap();
    sim.execute_step(1).unwrap();
    sim.mark_step(2, Verdict::Fail).unwrap();

    assert_eq!(
        sim.progress(),
        Progress {
            completed: 2,
            failed: 1,
            total: 4
        }
    );
    assert_eq!(sim.status_of(3).unwrap(), DisplayStatus::Pending);
}

#[test]
fn derived_queries_are_stable() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    sim.execute_step(0).unwrap();

    let first = (statuses(&sim), sim.progress());
    let second = (statuses(&sim), sim.progress());
    assert_eq!(first, second);
}

#[test]
fn rerunning_first_step_leaves_downstream_alone() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    sim.execute_step(0).unwrap();
    sim.execute_step(1).unwrap();
    assert_eq!(sim.current_step(), 2);

    sim.record_input(0, "amount", "0").unwrap();
    let outcome = sim.execute_step(0).unwrap();
    assert_eq!(outcome.verdict, Verdict::Fail);

    assert_eq!(sim.current_step(), 2);
    assert_eq!(sim.verdict(1).unwrap(), Some(Verdict::Pass));
    assert_eq!(sim.status_of(0).unwrap(), DisplayStatus::Failed);
}

#[test]
fn later_steps_cannot_pass_over_an_earlier_failure() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    sim.execute_step(0).unwrap();
    sim.execute_step(1).unwrap();

    sim.record_input(0, "amount", "abc").unwrap();
    sim.execute_step(0).unwrap();

    let outcome = sim.execute_step(2).unwrap();
    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(outcome.message, "Step 1 has not passed");
    assert_eq!(sim.input(2, "paymentId").unwrap(), None);
}

#[test]
fn out_of_order_execution_fails_each_step() {
    let mut sim = simulator();
    for step in (1..4).rev() {
        assert_eq!(sim.execute_step(step).unwrap().verdict, Verdict::Fail);
    }
    assert_eq!(sim.current_step(), 0);
    assert_eq!(sim.progress().failed, 3);
}

#[test]
fn failed_recapture_drops_the_stale_identifier() {
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    for step in 0..4 {
        sim.execute_step(step).unwrap();
    }
    assert!(sim.input(2, "paymentId").unwrap().is_some());

    sim.record_input(0, "amount", "0").unwrap();
    sim.execute_step(0).unwrap();
    sim.execute_step(1).unwrap();
    let outcome = sim.execute_step(2).unwrap();

    assert_eq!(outcome.verdict, Verdict::Fail);
    assert_eq!(sim.input(2, "paymentId").unwrap(), None);
    assert_eq!(sim.result(2).unwrap(), Some("Step 1 has not passed"));
}

#[test]
fn gate_messages_follow_the_first_step() {
    // Step 0 never executed.
    let mut sim = simulator();
    assert_eq!(sim.execute_step(1).unwrap().message, PREVIOUS_STEP_FAILED);
    assert_eq!(sim.execute_step(2).unwrap().message, "Step 1 has not passed");

    // Step 0 failed.
    let mut sim = simulator();
    enter_payment(&mut sim, "0");
    assert_eq!(sim.execute_step(0).unwrap().message, VALIDATION_FAILED);
    assert_eq!(sim.execute_step(1).unwrap().message, PREVIOUS_STEP_FAILED);
    assert_eq!(sim.execute_step(2).unwrap().message, "Step 1 has not passed");

    // Step 0 passed.
    let mut sim = simulator();
    enter_payment(&mut sim, "250");
    sim.execute_step(0).unwrap();
    let submitted = sim.execute_step(1).unwrap();
    assert_eq!(submitted.verdict, Verdict::Pass);
    assert_eq!(submitted.message, "Payment submitted successfully");
    let captured = sim.execute_step(2).unwrap();
    assert_eq!(captured.verdict, Verdict::Pass);
    assert!(captured.message.starts_with("Identifier captured: PAY-ACH-20240115-"));
}

#[test]
fn manual_steps_are_confirmed() {
    let case = Catalog::builtin().get("TC-002").cloned().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut sim =
        StepExecutionSimulator::with_identifiers(case, IdentifierSource::fixed(1, date)).unwrap();

    let outcome = sim.execute_step(0).unwrap();
    assert_eq!(outcome.verdict, Verdict::Pass);
    assert_eq!(outcome.message, STEP_CONFIRMED);
    assert_eq!(sim.current_step(), 1);
}
