use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::ui::theme;

/// Stored outcome of a step. An unset step has no verdict at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Display-only classification of a step, derived from verdicts and the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    #[default]
    Pending,
    Current,
    Passed,
    Failed,
    Skipped,
}

impl DisplayStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "◌",
            DisplayStatus::Current => "▶",
            DisplayStatus::Passed => "✔",
            DisplayStatus::Failed => "✘",
            DisplayStatus::Skipped => "⊘",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DisplayStatus::Passed => theme::GREEN,
            DisplayStatus::Failed => theme::RED,
            DisplayStatus::Current => theme::BLUE,
            DisplayStatus::Skipped => theme::OVERLAY0,
            DisplayStatus::Pending => theme::SUBTEXT0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "Pending",
            DisplayStatus::Current => "Current",
            DisplayStatus::Passed => "Passed",
            DisplayStatus::Failed => "Failed",
            DisplayStatus::Skipped => "Skipped",
        }
    }
}

/// Catalog-level status shown on the dashboard. Static metadata of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress", alias = "in_progress")]
    InProgress,
    Passed,
    Failed,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Passed,
        CaseStatus::Failed,
        CaseStatus::InProgress,
        CaseStatus::Pending,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "✔",
            CaseStatus::Failed => "✘",
            CaseStatus::InProgress => "⟳",
            CaseStatus::Pending => "◌",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CaseStatus::Passed => theme::GREEN,
            CaseStatus::Failed => theme::RED,
            CaseStatus::InProgress => theme::BLUE,
            CaseStatus::Pending => theme::YELLOW,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "Passed",
            CaseStatus::Failed => "Failed",
            CaseStatus::InProgress => "In Progress",
            CaseStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn color(&self) -> Color {
        match self {
            Priority::Critical => theme::RED,
            Priority::High => theme::PEACH,
            Priority::Medium => theme::YELLOW,
            Priority::Low => theme::GREEN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}
