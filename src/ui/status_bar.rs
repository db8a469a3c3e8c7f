use ratatui::{prelude::*, widgets::Paragraph};

use super::theme;
use crate::app::{App, InputMode, Screen};

fn hints(pairs: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" [{}]", key), Style::default().fg(theme::YELLOW)));
        spans.push(Span::raw(format!(" {} ", label)));
    }
    spans
}

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let spans = match (&app.mode, app.screen) {
        (InputMode::Search, _) => hints(&[("esc", "clear"), ("enter", "apply")]),
        (InputMode::EditField { .. } | InputMode::EditNote { .. }, _) => {
            hints(&[("esc", "cancel"), ("enter", "save")])
        }
        (InputMode::Normal, Screen::Dashboard) => {
            let mut spans = hints(&[
                ("enter", "open"),
                ("/", "search"),
                ("m", "module"),
                ("s", "status"),
                ("p", "priority"),
                ("c", "clear"),
                ("e", "edit"),
                ("q", "quit"),
            ]);
            let shown = app.visible_cases().len();
            spans.push(Span::styled(
                format!("  {}/{} cases", shown, app.catalog.len()),
                Style::default().fg(theme::OVERLAY0),
            ));
            spans
        }
        (InputMode::Normal, Screen::Detail) => {
            let mut spans = hints(&[
                ("i", "input"),
                ("tab", "field"),
                ("x", "execute"),
                ("P/F", "pass/fail"),
                ("n", "notes"),
                ("y", "copy"),
                ("R", "restart"),
                ("esc", "back"),
            ]);
            if let Some(run) = &app.run {
                let progress = run.progress();
                spans.push(Span::styled("  ✔ ", Style::default().fg(theme::GREEN)));
                spans.push(Span::styled(
                    progress.completed.to_string(),
                    Style::default().fg(theme::GREEN),
                ));
                spans.push(Span::styled("  ✘ ", Style::default().fg(theme::RED)));
                spans.push(Span::styled(
                    progress.failed.to_string(),
                    Style::default().fg(theme::RED),
                ));
                spans.push(Span::styled(
                    format!("  of {}", progress.total),
                    Style::default().fg(theme::MAUVE),
                ));
            }
            spans
        }
    };

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::SURFACE0));
    frame.render_widget(paragraph, area);
}
