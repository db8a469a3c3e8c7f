mod dashboard;
mod detail;
mod notifications;
mod search_box;
mod sidebar;
mod status_bar;
pub mod theme;

use ratatui::prelude::*;

use crate::app::{App, Screen};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match app.screen {
        Screen::Dashboard => dashboard::draw(frame, app, main_area),
        Screen::Detail => {
            let [steps_area, sidebar_area] =
                Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .areas(main_area);
            detail::draw(frame, app, steps_area);
            sidebar::draw(frame, app, sidebar_area);
        }
    }

    status_bar::draw(frame, app, status_area);
    notifications::draw(frame, app);
}
