use std::fs;

use pretty_assertions::assert_eq;

use casebook::models::{CaseStatus, Verdict};
use casebook::{CaseFilter, Catalog, CatalogError, StepExecutionSimulator};

const WIRE: &str = r#"
[[case]]
id = "TC-100"
title = "Wire Transfer"
module = "Wires"
priority = "High"
status = "In Progress"

[[case.steps]]
action = "Enter wire amount"
expected = "Amount accepted"
rule = { kind = "data_entry" }

[[case.steps.inputs]]
name = "amount"
label = "Amount"
kind = "number"
required = true

[[case.steps]]
action = "Submit wire"
expected = "Wire queued"
rule = { kind = "submit", message = "Wire queued" }
"#;

#[test]
fn workspace_cases_run_through_the_simulator() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("cases")).unwrap();
    fs::write(dir.path().join("cases/wire.toml"), WIRE).unwrap();

    let catalog = Catalog::load(dir.path(), &["cases/*.toml".to_string()], false).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.source_of("TC-100").is_some());

    let case = catalog.get("TC-100").cloned().unwrap();
    assert_eq!(case.status, CaseStatus::InProgress);
    assert_eq!(case.steps[1].number, 2);

    let mut sim = StepExecutionSimulator::new(case).unwrap();
    sim.record_input(0, "amount", "$2,500").unwrap();
    assert_eq!(sim.execute_step(0).unwrap().verdict, Verdict::Pass);
    let submitted = sim.execute_step(1).unwrap();
    assert_eq!(submitted.message, "Wire queued");
    assert_eq!(sim.progress().completed, 2);
}

#[test]
fn builtin_cases_merge_with_workspace_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wire.toml"), WIRE).unwrap();

    let catalog = Catalog::load(dir.path(), &["*.toml".to_string()], true).unwrap();
    assert_eq!(catalog.len(), 5);

    let filter = CaseFilter {
        module: Some("Wires".into()),
        ..CaseFilter::default()
    };
    let ids: Vec<&str> = catalog.filter(&filter).iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["TC-100"]);
}

#[test]
fn malformed_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[[case]]\nid = ").unwrap();

    let err = Catalog::load(dir.path(), &["*.toml".to_string()], false).unwrap_err();
    match err {
        CatalogError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unmatched_pattern_leaves_catalog_empty() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(dir.path(), &["missing/*.json".to_string()], false).unwrap();
    assert!(catalog.is_empty());
}
