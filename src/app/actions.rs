use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};
use tui_input::{Input, InputRequest};

use crate::{
    app::{App, InputMode, Screen},
    models::{CaseStatus, Priority, StepRule, Verdict},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NavigateUp,
    NavigateDown,
    ScrollUp,
    ScrollDown,
    JumpToStart,
    JumpToEnd,
    Select,
    Back,
    SearchEnter,
    SearchApply,
    SearchExit,
    CycleModule,
    CycleStatus,
    CyclePriority,
    ClearFilters,
    NextField,
    PreviousField,
    EditField,
    EditNote,
    EditInput(char),
    EditBackspace,
    EditLeft,
    EditRight,
    EditCommit,
    EditCancel,
    ExecuteStep,
    MarkPass,
    MarkFail,
    RestartRun,
    CopyResult,
    OpenInEditor,
}

/// Process a keyboard action.
pub fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,

        Action::NavigateUp => match app.screen {
            Screen::Dashboard => {
                app.selected_case = app.selected_case.saturating_sub(1);
                app.adjust_case_scroll();
            }
            Screen::Detail => {
                let index = app.selected_step.saturating_sub(1);
                select_step(app, index);
            }
        },

        Action::NavigateDown => match app.screen {
            Screen::Dashboard => {
                let max = app.visible_cases().len().saturating_sub(1);
                app.selected_case = (app.selected_case + 1).min(max);
                app.adjust_case_scroll();
            }
            Screen::Detail => {
                let index = app.selected_step + 1;
                select_step(app, index);
            }
        },

        Action::ScrollUp => {
            app.detail_scroll_offset = app.detail_scroll_offset.saturating_sub(1);
        }

        Action::ScrollDown => {
            app.detail_scroll_offset = app.detail_scroll_offset.saturating_add(1);
        }

        Action::JumpToStart => match app.screen {
            Screen::Dashboard => {
                app.selected_case = 0;
                app.case_scroll_offset = 0;
            }
            Screen::Detail => select_step(app, 0),
        },

        Action::JumpToEnd => match app.screen {
            Screen::Dashboard => {
                app.selected_case = app.visible_cases().len().saturating_sub(1);
                app.adjust_case_scroll();
            }
            Screen::Detail => select_step(app, usize::MAX),
        },

        Action::Select => {
            if app.screen == Screen::Dashboard
                && let Some(id) = app.selected_case().map(|c| c.id.clone())
            {
                app.open_case(&id);
            }
        }

        Action::Back => {
            if app.screen == Screen::Detail {
                app.close_case();
            }
        }

        Action::SearchEnter => {
            if app.screen == Screen::Dashboard {
                app.mode = InputMode::Search;
            }
        }

        Action::SearchApply => {
            app.mode = InputMode::Normal;
        }

        Action::SearchExit => {
            app.search.reset();
            app.mode = InputMode::Normal;
            app.refilter();
        }

        Action::CycleModule => {
            let modules: Vec<String> = app.catalog.modules().iter().map(|m| m.to_string()).collect();
            app.filter.module = cycle(&modules, app.filter.module.take());
            app.refilter();
        }

        Action::CycleStatus => {
            app.filter.status = cycle(&CaseStatus::ALL, app.filter.status);
            app.refilter();
        }

        Action::CyclePriority => {
            app.filter.priority = cycle(&Priority::ALL, app.filter.priority);
            app.refilter();
        }

        Action::ClearFilters => {
            app.search.reset();
            app.filter = Default::default();
            app.refilter();
        }

        Action::NextField => {
            let count = app.selected_step().map_or(0, |s| s.inputs.len());
            if count > 0 {
                app.selected_field = (app.selected_field + 1) % count;
            }
        }

        Action::PreviousField => {
            let count = app.selected_step().map_or(0, |s| s.inputs.len());
            if count > 0 {
                app.selected_field = (app.selected_field + count - 1) % count;
            }
        }

        Action::EditField => {
            let step = app.selected_step;
            let Some(field) = app.selected_field().map(|f| f.name.clone()) else {
                return;
            };
            let current = app
                .run
                .as_ref()
                .and_then(|run| run.input(step, &field).ok().flatten())
                .unwrap_or_default()
                .to_string();
            app.editor = Input::new(current);
            app.mode = InputMode::EditField { step, field };
        }

        Action::EditNote => {
            let step = app.selected_step;
            if let Some(run) = &app.run {
                let current = run.note(step).ok().flatten().unwrap_or_default();
                app.editor = Input::new(current.to_string());
                app.mode = InputMode::EditNote { step };
            }
        }

        Action::EditInput(c) => edit(app, InputRequest::InsertChar(c)),
        Action::EditBackspace => edit(app, InputRequest::DeletePrevChar),
        Action::EditLeft => edit(app, InputRequest::GoToPrevChar),
        Action::EditRight => edit(app, InputRequest::GoToNextChar),

        Action::EditCommit => commit_edit(app),

        Action::EditCancel => {
            app.editor.reset();
            app.mode = InputMode::Normal;
        }

        Action::ExecuteStep => {
            let step = app.selected_step;
            let Some(run) = app.run.as_mut() else { return };
            match run.execute_step(step) {
                Ok(outcome) => {
                    let number = run.case().steps[step].number;
                    app.notifier.outcome(number, &outcome);
                }
                Err(e) => {
                    warn!(error = %e, "execute failed");
                    app.notifier.error(e.to_string());
                }
            }
        }

        Action::MarkPass => mark(app, Verdict::Pass),
        Action::MarkFail => mark(app, Verdict::Fail),

        Action::RestartRun => {
            if let Some(run) = app.run.as_mut() {
                run.restart();
                app.selected_step = 0;
                app.selected_field = 0;
                app.step_scroll_offset = 0;
                app.detail_scroll_offset = 0;
                app.notifier.info("Run restarted", 2);
            }
        }

        Action::CopyResult => {
            let Some(run) = &app.run else { return };
            let step = app.selected_step;
            let Some(def) = run.case().steps.get(step) else { return };

            let captured = match &def.rule {
                StepRule::CaptureIdentifier { field, .. } => {
                    run.input(step, field).ok().flatten().map(str::to_string)
                }
                _ => None,
            };

            match captured.or_else(|| run.result(step).ok().flatten().map(str::to_string)) {
                Some(text) => app.pending_copy = Some(text),
                None => app.notifier.info("Nothing to copy yet", 2),
            }
        }

        Action::OpenInEditor => {
            let id = match app.screen {
                Screen::Dashboard => app.selected_case().map(|c| c.id.clone()),
                Screen::Detail => app.run.as_ref().map(|r| r.case().id.clone()),
            };
            let Some(id) = id else { return };

            match app.catalog.source_of(&id) {
                Some(path) => app.pending_editor = Some((path.to_path_buf(), id)),
                None => app
                    .notifier
                    .info(format!("{} is built in and has no catalog file", id), 3),
            }
        }
    }
}

pub fn trigger_action(key: KeyEvent, screen: Screen, mode: &InputMode) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Search => match key.code {
            KeyCode::Esc => Some(Action::SearchExit),
            KeyCode::Enter => Some(Action::SearchApply),
            KeyCode::Backspace => Some(Action::EditBackspace),
            KeyCode::Left => Some(Action::EditLeft),
            KeyCode::Right => Some(Action::EditRight),
            KeyCode::Up => Some(Action::NavigateUp),
            KeyCode::Down => Some(Action::NavigateDown),
            KeyCode::Char(c) => Some(Action::EditInput(c)),
            _ => None,
        },

        InputMode::EditField { .. } | InputMode::EditNote { .. } => match key.code {
            KeyCode::Esc => Some(Action::EditCancel),
            KeyCode::Enter => Some(Action::EditCommit),
            KeyCode::Backspace => Some(Action::EditBackspace),
            KeyCode::Left => Some(Action::EditLeft),
            KeyCode::Right => Some(Action::EditRight),
            KeyCode::Char(c) => Some(Action::EditInput(c)),
            _ => None,
        },

        InputMode::Normal => match screen {
            Screen::Dashboard => map_dashboard_key(key),
            Screen::Detail => map_detail_key(key),
        },
    }
}

fn map_dashboard_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::JumpToStart),
        KeyCode::Char('G') | KeyCode::End => Some(Action::JumpToEnd),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Some(Action::Select),
        KeyCode::Char('f') | KeyCode::Char('/') => Some(Action::SearchEnter),
        KeyCode::Char('m') => Some(Action::CycleModule),
        KeyCode::Char('s') => Some(Action::CycleStatus),
        KeyCode::Char('p') => Some(Action::CyclePriority),
        KeyCode::Char('c') => Some(Action::ClearFilters),
        KeyCode::Char('e') => Some(Action::OpenInEditor),
        _ => None,
    }
}

fn map_detail_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Left | KeyCode::Char('h') => {
            Some(Action::Back)
        }
        KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::JumpToStart),
        KeyCode::Char('G') | KeyCode::End => Some(Action::JumpToEnd),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PreviousField),
        KeyCode::Char('i') | KeyCode::Enter => Some(Action::EditField),
        KeyCode::Char('n') => Some(Action::EditNote),
        KeyCode::Char('x') => Some(Action::ExecuteStep),
        KeyCode::Char('P') => Some(Action::MarkPass),
        KeyCode::Char('F') => Some(Action::MarkFail),
        KeyCode::Char('R') => Some(Action::RestartRun),
        KeyCode::Char('y') => Some(Action::CopyResult),
        KeyCode::Char('e') => Some(Action::OpenInEditor),
        _ => None,
    }
}

/// Move the step selection, clamped to the case. Field selection restarts.
fn select_step(app: &mut App, index: usize) {
    let Some(run) = &app.run else { return };
    let max = run.step_count().saturating_sub(1);
    app.selected_step = index.min(max);
    app.selected_field = 0;
    app.detail_scroll_offset = 0;
    app.adjust_step_scroll();
}

fn edit(app: &mut App, request: InputRequest) {
    match app.mode {
        InputMode::Search => {
            app.search.handle(request);
            app.selected_case = 0;
            app.refilter();
        }
        InputMode::EditField { .. } | InputMode::EditNote { .. } => {
            app.editor.handle(request);
        }
        InputMode::Normal => {}
    }
}

fn commit_edit(app: &mut App) {
    let mode = std::mem::replace(&mut app.mode, InputMode::Normal);
    let value = app.editor.value().to_string();
    app.editor.reset();

    let Some(run) = app.run.as_mut() else { return };
    let result = match mode {
        InputMode::EditField { step, field } => {
            debug!(step, field = %field, "input recorded");
            run.record_input(step, &field, value)
        }
        InputMode::EditNote { step } => run.record_note(step, &value),
        InputMode::Normal | InputMode::Search => Ok(()),
    };

    if let Err(e) = result {
        app.notifier.error(e.to_string());
    }
}

fn mark(app: &mut App, verdict: Verdict) {
    let step = app.selected_step;
    let Some(run) = app.run.as_mut() else { return };
    match run.mark_step(step, verdict) {
        Ok(outcome) => {
            let number = run.case().steps[step].number;
            app.notifier.outcome(number, &outcome);
        }
        Err(e) => app.notifier.error(e.to_string()),
    }
}

/// Step an optional filter through `options`: none, first, ..., last, none.
fn cycle<T: Clone + PartialEq>(options: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => options.first().cloned(),
        Some(value) => {
            let pos = options.iter().position(|o| *o == value)?;
            options.get(pos + 1).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::Catalog;
    use crate::models::DisplayStatus;

    fn app() -> App {
        App::new(PathBuf::from("/work"), Catalog::builtin())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_action(app, Action::EditInput(c));
        }
    }

    fn enter_field(app: &mut App, field_index: usize, text: &str) {
        app.selected_field = field_index;
        handle_action(app, Action::EditField);
        type_text(app, text);
        handle_action(app, Action::EditCommit);
    }

    #[test]
    fn cycle_wraps_through_none() {
        let options = [1, 2];
        assert_eq!(cycle(&options, None), Some(1));
        assert_eq!(cycle(&options, Some(1)), Some(2));
        assert_eq!(cycle(&options, Some(2)), None);
        assert_eq!(cycle(&options, Some(9)), None);
    }

    #[test]
    fn keys_depend_on_screen_and_mode() {
        assert_eq!(
            trigger_action(key(KeyCode::Char('x')), Screen::Detail, &InputMode::Normal),
            Some(Action::ExecuteStep)
        );
        assert_eq!(
            trigger_action(key(KeyCode::Char('x')), Screen::Dashboard, &InputMode::Normal),
            None
        );
        assert_eq!(
            trigger_action(key(KeyCode::Char('x')), Screen::Dashboard, &InputMode::Search),
            Some(Action::EditInput('x'))
        );
        let editing = InputMode::EditNote { step: 0 };
        assert_eq!(
            trigger_action(key(KeyCode::Char('q')), Screen::Detail, &editing),
            Some(Action::EditInput('q'))
        );
        assert_eq!(
            trigger_action(key(KeyCode::Esc), Screen::Detail, &editing),
            Some(Action::EditCancel)
        );
    }

    #[test]
    fn search_narrows_dashboard() {
        let mut app = app();
        handle_action(&mut app, Action::SearchEnter);
        assert_eq!(app.mode, InputMode::Search);
        type_text(&mut app, "wire");
        let ids: Vec<&str> = app.visible_cases().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["TC-002"]);

        handle_action(&mut app, Action::SearchExit);
        assert_eq!(app.visible_cases().len(), 4);
    }

    #[test]
    fn filter_cycles_and_clears() {
        let mut app = app();
        handle_action(&mut app, Action::CycleModule);
        assert_eq!(app.filter.module.as_deref(), Some("ACH Payments"));
        assert_eq!(app.visible_cases().len(), 2);

        handle_action(&mut app, Action::CycleStatus);
        assert_eq!(app.filter.status, Some(CaseStatus::Passed));
        assert_eq!(app.visible_cases().len(), 1);

        handle_action(&mut app, Action::ClearFilters);
        assert!(app.filter.is_empty());
        assert_eq!(app.visible_cases().len(), 4);
    }

    #[test]
    fn select_opens_run_and_back_discards_it() {
        let mut app = app();
        handle_action(&mut app, Action::NavigateDown);
        handle_action(&mut app, Action::Select);
        assert_eq!(app.screen, Screen::Detail);
        assert_eq!(app.run.as_ref().unwrap().case().id, "TC-002");

        handle_action(&mut app, Action::Back);
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.run.is_none());
    }

    #[test]
    fn detail_flow_drives_simulator() {
        let mut app = app();
        assert!(app.open_case("TC-001"));

        enter_field(&mut app, 0, "250.00");
        enter_field(&mut app, 1, "Checking (****1234)");
        enter_field(&mut app, 2, "Savings (****5678)");
        handle_action(&mut app, Action::ExecuteStep);

        let run = app.run.as_ref().unwrap();
        assert_eq!(run.input(0, "amount").unwrap(), Some("250.00"));
        assert_eq!(run.status_of(0).unwrap(), DisplayStatus::Passed);
        assert_eq!(run.current_step(), 1);

        handle_action(&mut app, Action::NavigateDown);
        handle_action(&mut app, Action::ExecuteStep);
        handle_action(&mut app, Action::NavigateDown);
        handle_action(&mut app, Action::ExecuteStep);
        handle_action(&mut app, Action::CopyResult);

        let copied = app.pending_copy.take().unwrap();
        assert!(copied.starts_with("PAY-ACH-"), "{}", copied);

        handle_action(&mut app, Action::MarkFail);
        handle_action(&mut app, Action::CopyResult);
        assert_eq!(app.pending_copy.take().as_deref(), Some("Marked as failed"));
    }

    #[test]
    fn edit_cancel_keeps_previous_value() {
        let mut app = app();
        app.open_case("TC-001");
        enter_field(&mut app, 0, "10");

        handle_action(&mut app, Action::EditField);
        type_text(&mut app, "99");
        handle_action(&mut app, Action::EditCancel);

        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.run.as_ref().unwrap().input(0, "amount").unwrap(), Some("10"));
    }

    #[test]
    fn out_of_order_manual_pass_is_toasted() {
        let mut app = app();
        app.open_case("TC-002");
        handle_action(&mut app, Action::JumpToEnd);
        assert_eq!(app.selected_step, 5);
        handle_action(&mut app, Action::MarkPass);

        let toast = app.notifier.recent().unwrap();
        assert_eq!(toast.kind, crate::app::NotificationKind::Error);
        assert_eq!(app.run.as_ref().unwrap().progress().completed, 0);
    }

    #[test]
    fn failure_note_is_recorded() {
        let mut app = app();
        app.open_case("TC-003");
        handle_action(&mut app, Action::MarkFail);
        handle_action(&mut app, Action::EditNote);
        type_text(&mut app, "defect DEF-7");
        handle_action(&mut app, Action::EditCommit);
        assert_eq!(app.run.as_ref().unwrap().note(0).unwrap(), Some("defect DEF-7"));
    }

    #[test]
    fn builtin_cases_cannot_be_opened_in_editor() {
        let mut app = app();
        handle_action(&mut app, Action::OpenInEditor);
        assert!(app.pending_editor.is_none());
        assert!(app.notifier.recent().is_some());
    }

    #[test]
    fn restart_resets_selection_and_state() {
        let mut app = app();
        app.open_case("TC-003");
        handle_action(&mut app, Action::MarkPass);
        handle_action(&mut app, Action::NavigateDown);
        handle_action(&mut app, Action::RestartRun);
        assert_eq!(app.selected_step, 0);
        assert_eq!(app.run.as_ref().unwrap().progress().completed, 0);
    }
}
