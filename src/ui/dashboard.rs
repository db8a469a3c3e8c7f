use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::{search_box, theme};
use crate::app::{App, InputMode};
use crate::models::TestCase;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let [stats_area, filter_area, list_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .areas(area);

    draw_stats(frame, app, stats_area);
    search_box::draw(frame, app, app.mode == InputMode::Search, filter_area);
    draw_cases(frame, app, list_area);
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.catalog.stats();
    let cards = [
        ("Total Test Cases", stats.total, theme::TEXT),
        ("Passed", stats.passed, theme::GREEN),
        ("In Progress", stats.in_progress, theme::BLUE),
        ("Failed", stats.failed, theme::RED),
    ];

    let areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for ((label, count, color), card_area) in cards.into_iter().zip(areas.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::SURFACE2));
        let line = Line::from(vec![
            Span::styled(format!("{} ", count), Style::default().fg(color).bold()),
            Span::styled(label, Style::default().fg(theme::SUBTEXT0)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), *card_area);
    }
}

fn draw_cases(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Test Cases ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BLUE));

    // Every case takes three lines: badges + title, description, metadata.
    let inner_height = block.inner(area).height as usize;
    app.case_viewport_height = (inner_height / 3).max(1);
    app.adjust_case_scroll();

    let visible = app.visible_cases();
    if visible.is_empty() {
        let empty = Paragraph::new("No test cases match the current filter.")
            .style(Style::default().fg(theme::OVERLAY0))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let end = (app.case_scroll_offset + app.case_viewport_height).min(visible.len());
    let items: Vec<ListItem> = visible[app.case_scroll_offset..end]
        .iter()
        .enumerate()
        .map(|(view_i, case)| {
            let selected = view_i + app.case_scroll_offset == app.selected_case;
            let item = ListItem::new(case_text(case));
            if selected {
                item.style(Style::default().bg(theme::SURFACE1))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn case_text(case: &TestCase) -> Text<'_> {
    let header = Line::from(vec![
        Span::styled(format!("{} ", case.status.icon()), Style::default().fg(case.status.color())),
        Span::styled(format!("{} ", case.id), Style::default().fg(theme::OVERLAY0)),
        Span::styled(
            format!("[{}] ", case.priority.label()),
            Style::default().fg(case.priority.color()),
        ),
        Span::styled(format!("[{}] ", case.module), Style::default().fg(theme::MAUVE)),
        Span::styled(&case.title, Style::default().fg(theme::TEXT).bold()),
        Span::raw("  "),
        Span::styled(case.status.label(), Style::default().fg(case.status.color())),
    ]);

    let description = Line::from(Span::styled(
        format!("    {}", case.description),
        Style::default().fg(theme::SUBTEXT0),
    ));

    let updated = case
        .last_updated
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into());
    let meta = Line::from(Span::styled(
        format!(
            "    Assignee: {}   {} steps   Updated: {}",
            case.assignee.as_deref().unwrap_or("unassigned"),
            case.step_count(),
            updated
        ),
        Style::default().fg(theme::OVERLAY0),
    ));

    Text::from(vec![header, description, meta])
}
