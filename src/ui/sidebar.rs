use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use super::theme;
use crate::app::App;
use crate::models::DisplayStatus;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let Some(run) = app.run.as_ref() else {
        return;
    };
    let case = run.case();

    let [details_area, progress_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(6)]).areas(area);

    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into())
    };

    let mut lines = vec![
        detail_line("Assignee", case.assignee.clone().unwrap_or_else(|| "unassigned".into())),
        detail_line("Created", date(case.created)),
        detail_line("Last Updated", date(case.last_updated)),
        detail_line("Total Steps", case.step_count().to_string()),
        Line::from(""),
        Line::from(Span::styled(
            case.description.as_str(),
            Style::default().fg(theme::SUBTEXT0),
        )),
    ];

    if !case.preconditions.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "━━ Preconditions ━━",
            Style::default().fg(theme::YELLOW),
        )));
        for condition in &case.preconditions {
            lines.push(Line::from(vec![
                Span::styled("✔ ", Style::default().fg(theme::GREEN)),
                Span::styled(condition.as_str(), Style::default().fg(theme::SUBTEXT0)),
            ]));
        }
    }

    let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Test Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::SURFACE2)),
    );
    frame.render_widget(details, details_area);

    let block = Block::default()
        .title(" Execution Progress ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE2));
    let inner = block.inner(progress_area);
    frame.render_widget(block, progress_area);

    let progress = run.progress();
    let [completed_area, gauge_area, counts_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Completed ", Style::default().fg(theme::SUBTEXT0)),
            Span::styled(
                format!("{} / {}", progress.completed, progress.total),
                Style::default().fg(theme::TEXT).bold(),
            ),
        ])),
        completed_area,
    );

    let percent = (progress.ratio() * 100.0).min(100.0) as u16;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme::BLUE).bg(theme::SURFACE0))
        .percent(percent)
        .label(format!("{}%", percent));
    frame.render_widget(gauge, gauge_area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} {} Passed", DisplayStatus::Passed.icon(), progress.completed),
                Style::default().fg(DisplayStatus::Passed.color()),
            ),
            Span::raw("   "),
            Span::styled(
                format!("{} {} Failed", DisplayStatus::Failed.icon(), progress.failed),
                Style::default().fg(DisplayStatus::Failed.color()),
            ),
        ])),
        counts_area,
    );
}

fn detail_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<13}", label), Style::default().fg(theme::TEXT).bold()),
        Span::styled(value, Style::default().fg(theme::SUBTEXT0)),
    ])
}
