use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    app::notifier::Notifier,
    catalog::{Catalog, CaseFilter},
    models::{InputField, Step, TestCase},
    simulator::StepExecutionSimulator,
};

pub mod actions;
pub mod notifier;

pub use actions::{Action, handle_action, trigger_action};
pub use notifier::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Detail,
}

/// What keystrokes currently go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    EditField { step: usize, field: String },
    EditNote { step: usize },
}

pub struct App {
    pub workspace: PathBuf,
    pub catalog: Catalog,
    pub screen: Screen,
    pub mode: InputMode,
    pub filter: CaseFilter,
    pub search: tui_input::Input,
    /// Text being edited for a step input or a failure note.
    pub editor: tui_input::Input,
    pub selected_case: usize,
    pub case_scroll_offset: usize,
    pub case_viewport_height: usize,
    pub run: Option<StepExecutionSimulator>,
    pub selected_step: usize,
    pub selected_field: usize,
    pub step_scroll_offset: usize,
    pub step_viewport_height: usize,
    pub detail_scroll_offset: u16,
    /// (catalog_file, case_id)
    pub pending_editor: Option<(PathBuf, String)>,
    pub pending_copy: Option<String>,
    pub should_quit: bool,
    pub notifier: Notifier,
}

impl App {
    pub fn new(workspace: PathBuf, catalog: Catalog) -> Self {
        Self {
            workspace,
            catalog,
            screen: Screen::Dashboard,
            mode: InputMode::Normal,
            filter: CaseFilter::default(),
            search: tui_input::Input::default(),
            editor: tui_input::Input::default(),
            selected_case: 0,
            case_scroll_offset: 0,
            case_viewport_height: 0,
            run: None,
            selected_step: 0,
            selected_field: 0,
            step_scroll_offset: 0,
            step_viewport_height: 0,
            detail_scroll_offset: 0,
            pending_editor: None,
            pending_copy: None,
            should_quit: false,
            notifier: Notifier::new(),
        }
    }

    /// Cases visible on the dashboard under the current filter.
    pub fn visible_cases(&self) -> Vec<&TestCase> {
        self.catalog.filter(&self.filter)
    }

    pub fn selected_case(&self) -> Option<&TestCase> {
        self.visible_cases().get(self.selected_case).copied()
    }

    /// Start a fresh run of the case with `id` and switch to the detail screen.
    pub fn open_case(&mut self, id: &str) -> bool {
        let Some(case) = self.catalog.get(id).cloned() else {
            warn!(id, "unknown test case");
            self.notifier.error(format!("Test case '{}' not found", id));
            return false;
        };

        match StepExecutionSimulator::new(case) {
            Ok(sim) => {
                self.run = Some(sim);
                self.screen = Screen::Detail;
                self.mode = InputMode::Normal;
                self.selected_step = 0;
                self.selected_field = 0;
                self.step_scroll_offset = 0;
                self.detail_scroll_offset = 0;
                true
            }
            Err(e) => {
                self.notifier.error(e.to_string());
                false
            }
        }
    }

    /// Leave the detail screen. The run is discarded.
    pub fn close_case(&mut self) {
        if let Some(run) = self.run.take() {
            info!(case = %run.case().id, progress = ?run.progress(), "run discarded");
        }
        self.screen = Screen::Dashboard;
        self.mode = InputMode::Normal;
    }

    pub fn selected_step(&self) -> Option<&Step> {
        self.run.as_ref()?.case().steps.get(self.selected_step)
    }

    pub fn selected_field(&self) -> Option<&InputField> {
        self.selected_step()?.inputs.get(self.selected_field)
    }

    /// Clamp the dashboard selection after the filter changed.
    pub fn refilter(&mut self) {
        self.filter.query = self.search.value().to_string();
        let max = self.visible_cases().len().saturating_sub(1);
        self.selected_case = self.selected_case.min(max);
        self.case_scroll_offset = 0;
        self.adjust_case_scroll();
    }

    pub fn adjust_case_scroll(&mut self) {
        if self.case_viewport_height == 0 {
            return;
        }
        if self.selected_case < self.case_scroll_offset {
            self.case_scroll_offset = self.selected_case;
        } else if self.selected_case >= self.case_scroll_offset + self.case_viewport_height {
            self.case_scroll_offset = self.selected_case - self.case_viewport_height + 1;
        }
    }

    pub fn adjust_step_scroll(&mut self) {
        if self.step_viewport_height == 0 {
            return;
        }
        if self.selected_step < self.step_scroll_offset {
            self.step_scroll_offset = self.selected_step;
        } else if self.selected_step >= self.step_scroll_offset + self.step_viewport_height {
            self.step_scroll_offset = self.selected_step - self.step_viewport_height + 1;
        }
    }
}
