//! The set of known test cases, keyed by identifier.
//!
//! Built-in demo cases are always available unless disabled; catalog files
//! matched by the configured glob patterns are layered on top of them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::CatalogError;
use crate::models::{CaseStatus, InputField, Priority, Step, StepRule, TestCase, ValueKind};

/// Dashboard filters. Every populated criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub query: String,
    pub module: Option<String>,
    pub status: Option<CaseStatus>,
    pub priority: Option<Priority>,
}

impl CaseFilter {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.module.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }

    pub fn matches(&self, case: &TestCase) -> bool {
        (self.query.is_empty() || case.matches(&self.query))
            && self.module.as_ref().is_none_or(|m| case.module == *m)
            && self.status.is_none_or(|s| case.status == s)
            && self.priority.is_none_or(|p| case.priority == p)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub passed: usize,
    pub in_progress: usize,
    pub failed: usize,
    pub pending: usize,
}

#[derive(Debug, Default)]
pub struct Catalog {
    cases: Vec<TestCase>,
    /// File each case was loaded from. Built-in cases have no entry.
    sources: HashMap<String, PathBuf>,
}

#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    case: Vec<TestCase>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    List(Vec<TestCase>),
    Wrapped { case: Vec<TestCase> },
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog files matching `patterns` (relative to `workspace`).
    pub fn load(
        workspace: &Path,
        patterns: &[String],
        include_builtin: bool,
    ) -> Result<Self, CatalogError> {
        let mut catalog = if include_builtin {
            Self::builtin()
        } else {
            Self::new()
        };

        for pattern in patterns {
            let full = if Path::new(pattern).is_absolute() {
                pattern.clone()
            } else {
                workspace.join(pattern).to_string_lossy().to_string()
            };

            let entries = glob::glob(&full).map_err(|source| CatalogError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;

            let mut paths: Vec<PathBuf> = entries
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!(
                            pattern = %pattern,
                            path = %e.path().display(),
                            error = %e.error(),
                            "skipping unreadable catalog path"
                        );
                        None
                    }
                })
                .filter(|p| p.is_file())
                .collect();
            paths.sort();
            debug!(pattern = %pattern, matched = paths.len(), "expanded catalog pattern");

            for path in paths {
                for case in parse_file(&path)? {
                    catalog.insert(case, Some(path.clone()));
                }
            }
        }

        info!(cases = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Add a case, replacing any earlier case with the same identifier.
    pub fn insert(&mut self, mut case: TestCase, source: Option<PathBuf>) {
        case.number_steps();
        match &source {
            Some(path) => {
                self.sources.insert(case.id.clone(), path.clone());
            }
            None => {
                self.sources.remove(&case.id);
            }
        }

        if let Some(existing) = self.cases.iter_mut().find(|c| c.id == case.id) {
            warn!(id = %case.id, "duplicate test case id, later definition wins");
            *existing = case;
        } else {
            self.cases.push(case);
        }
    }

    pub fn get(&self, id: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn source_of(&self, id: &str) -> Option<&Path> {
        self.sources.get(id).map(PathBuf::as_path)
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn filter(&self, filter: &CaseFilter) -> Vec<&TestCase> {
        self.cases.iter().filter(|c| filter.matches(c)).collect()
    }

    /// Distinct module names, in catalog order.
    pub fn modules(&self) -> Vec<&str> {
        let mut modules: Vec<&str> = Vec::new();
        for case in &self.cases {
            if !case.module.is_empty() && !modules.contains(&case.module.as_str()) {
                modules.push(&case.module);
            }
        }
        modules
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.cases.len(),
            ..Default::default()
        };
        for case in &self.cases {
            match case.status {
                CaseStatus::Passed => stats.passed += 1,
                CaseStatus::InProgress => stats.in_progress += 1,
                CaseStatus::Failed => stats.failed += 1,
                CaseStatus::Pending => stats.pending += 1,
            }
        }
        stats
    }

    /// The demo cases shipped with the binary.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for case in builtin_cases() {
            catalog.insert(case, None);
        }
        catalog
    }
}

fn parse_file(path: &Path) -> Result<Vec<TestCase>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| CatalogError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut cases = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            toml::from_str::<TomlCatalog>(&content)
                .map_err(|e| parse_error(e.to_string()))?
                .case
        }
        Some("json") => match serde_json::from_str::<JsonCatalog>(&content)
            .map_err(|e| parse_error(e.to_string()))?
        {
            JsonCatalog::List(cases) | JsonCatalog::Wrapped { case: cases } => cases,
        },
        _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
    };

    for case in &mut cases {
        if case.steps.is_empty() {
            return Err(CatalogError::EmptyCase {
                id: case.id.clone(),
                path: path.to_path_buf(),
            });
        }
        case.number_steps();
        if let Some(number) = case.duplicate_step_number() {
            return Err(CatalogError::DuplicateStep {
                id: case.id.clone(),
                number,
                path: path.to_path_buf(),
            });
        }
    }

    Ok(cases)
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn field(name: &str, label: &str, placeholder: &str, kind: ValueKind, required: bool) -> InputField {
    InputField {
        name: name.into(),
        label: label.into(),
        placeholder: placeholder.into(),
        kind,
        required,
    }
}

fn manual_step(action: &str, expected: &str) -> Step {
    Step {
        number: 0,
        action: action.into(),
        data: None,
        expected: expected.into(),
        inputs: Vec::new(),
        rule: StepRule::Manual,
    }
}

fn builtin_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            id: "TC-001".into(),
            title: "ACH Transfer - Successful Payment Processing".into(),
            module: "ACH Payments".into(),
            priority: Priority::High,
            status: CaseStatus::Passed,
            assignee: Some("Sarah Johnson".into()),
            created: date(2024, 1, 10),
            last_updated: date(2024, 1, 15),
            description: "Verifies the end-to-end flow of a successful ACH transfer between \
                checking accounts, including validation, processing and confirmation messaging."
                .into(),
            preconditions: vec![
                "User must have valid login credentials".into(),
                "Source account must have sufficient funds ($500+)".into(),
                "Destination account must be valid and active".into(),
                "ACH transfer limits must be within daily/monthly thresholds".into(),
            ],
            steps: vec![
                Step {
                    number: 1,
                    action: "User should enter payment details".into(),
                    data: Some(
                        "Amount: $250.00, From: Checking (****1234), To: Savings (****5678), \
                         Memo: 'Monthly transfer'"
                            .into(),
                    ),
                    expected: "Payment form validates all fields and displays confirmation \
                        screen with transaction summary"
                        .into(),
                    inputs: vec![
                        field("amount", "Amount", "250.00", ValueKind::Number, true),
                        field("fromAccount", "From account", "Checking (****1234)", ValueKind::Text, true),
                        field("toAccount", "To account", "Savings (****5678)", ValueKind::Text, true),
                        field("memo", "Memo", "Monthly transfer", ValueKind::Text, false),
                    ],
                    rule: StepRule::DataEntry,
                },
                Step {
                    number: 2,
                    action: "System should successfully submit the payment".into(),
                    data: Some("User clicks 'Submit Payment' button".into()),
                    expected: "Success message should get displayed with payment confirmation"
                        .into(),
                    inputs: Vec::new(),
                    rule: StepRule::Submit {
                        message: "Payment submitted successfully".into(),
                    },
                },
                Step {
                    number: 3,
                    action: "User should make note of the payment ID".into(),
                    data: Some("Payment ID displayed on success screen".into()),
                    expected: "Payment ID format: PAY-ACH-YYYYMMDD-XXXXXX \
                        (e.g., PAY-ACH-20240115-001234)"
                        .into(),
                    inputs: vec![field("paymentId", "Payment ID", "", ValueKind::Text, false)],
                    rule: StepRule::CaptureIdentifier {
                        prefix: "PAY-ACH".into(),
                        field: "paymentId".into(),
                    },
                },
                Step {
                    number: 4,
                    action: "System should display payment status".into(),
                    data: Some("Check payment status in transaction history".into()),
                    expected: "Payment status should display as 'Entered' in the transaction list"
                        .into(),
                    inputs: Vec::new(),
                    rule: StepRule::StatusCheck {
                        status: "Entered".into(),
                    },
                },
            ],
        },
        TestCase {
            id: "TC-002".into(),
            title: "Wire Transfer - International Payment Validation".into(),
            module: "Wire Payments".into(),
            priority: Priority::Critical,
            status: CaseStatus::InProgress,
            assignee: Some("Mike Chen".into()),
            created: date(2024, 1, 8),
            last_updated: date(2024, 1, 14),
            description: "Test international wire transfer with currency conversion and \
                compliance checks"
                .into(),
            preconditions: vec!["Beneficiary bank must support SWIFT transfers".into()],
            steps: vec![
                manual_step("Enter beneficiary details", "Beneficiary form accepts IBAN and SWIFT code"),
                manual_step("Enter amount in USD", "Converted EUR amount is displayed"),
                manual_step("Review exchange rate", "Rate matches the current treasury rate"),
                manual_step("Run compliance screening", "Screening completes without hits"),
                manual_step("Submit the wire", "Confirmation with reference number is shown"),
                manual_step("Check wire status", "Status shows 'Pending Release'"),
            ],
        },
        TestCase {
            id: "TC-003".into(),
            title: "Internal Transfer - Same Account Validation".into(),
            module: "Transfers".into(),
            priority: Priority::Medium,
            status: CaseStatus::Failed,
            assignee: Some("Emily Davis".into()),
            created: date(2024, 1, 5),
            last_updated: date(2024, 1, 13),
            description: "Validate internal transfers between savings and checking accounts"
                .into(),
            preconditions: vec!["User holds both a savings and a checking account".into()],
            steps: vec![
                manual_step("Select the same account as source and destination", "Form rejects the selection"),
                manual_step("Select different accounts and submit", "Transfer completes"),
                manual_step("Check both balances", "Balances reflect the transfer"),
            ],
        },
        TestCase {
            id: "TC-004".into(),
            title: "ACH Return Processing - Invalid Account".into(),
            module: "ACH Payments".into(),
            priority: Priority::High,
            status: CaseStatus::Pending,
            assignee: Some("David Wilson".into()),
            created: date(2024, 1, 3),
            last_updated: date(2024, 1, 12),
            description: "Test ACH return processing when destination account is invalid or \
                closed"
                .into(),
            preconditions: vec!["A closed destination account exists in the test bank".into()],
            steps: vec![
                manual_step("Initiate ACH to the closed account", "Payment is accepted for processing"),
                manual_step("Run the return file import", "Return code R02 is recorded"),
                manual_step("Check the originating account", "Funds are credited back"),
                manual_step("Check customer notifications", "Return notice is sent"),
                manual_step("Check the payment status", "Status shows 'Returned'"),
            ],
        },
    ]
}
