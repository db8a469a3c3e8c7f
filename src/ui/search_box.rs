use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::App;
use crate::catalog::CaseFilter;

/// Search text on the left, active module/status/priority filters on the right.
pub fn draw(frame: &mut Frame, app: &App, active: bool, area: Rect) {
    let query = app.search.value();
    let (display, border_color, text_style) = if active {
        (
            format!("/ {}│", query),
            theme::BLUE,
            Style::default().fg(theme::TEXT),
        )
    } else if query.is_empty() {
        (
            "/ search by id, title or description".to_string(),
            theme::SURFACE2,
            Style::default().fg(theme::OVERLAY0),
        )
    } else {
        (
            format!("/ {}", query),
            theme::SURFACE2,
            Style::default().fg(theme::SUBTEXT0),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Filter ")
        .title_bottom(filter_chips(&app.filter).right_aligned());
    let paragraph = Paragraph::new(display).style(text_style).block(block);
    frame.render_widget(paragraph, area);
}

fn filter_chips(filter: &CaseFilter) -> Line<'static> {
    let chip = |key: &'static str, value: Option<String>| {
        let (text, color) = match value {
            Some(v) => (v, theme::TEAL),
            None => ("all".to_string(), theme::OVERLAY0),
        };
        vec![
            Span::styled(format!(" [{}] ", key), Style::default().fg(theme::YELLOW)),
            Span::styled(text, Style::default().fg(color)),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(chip("m", filter.module.clone()));
    spans.extend(chip("s", filter.status.map(|s| s.label().to_string())));
    spans.extend(chip("p", filter.priority.map(|p| p.label().to_string())));
    spans.push(Span::raw(" "));
    Line::from(spans)
}
