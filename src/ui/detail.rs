use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::theme;
use crate::app::{App, InputMode};
use crate::models::{DisplayStatus, Step, Verdict};
use crate::simulator::StepExecutionSimulator;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(run) = app.run.as_ref() else {
        return;
    };
    let step_rows = run.step_count() as u16 + 2;

    let [header_area, list_area, body_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(step_rows.min(area.height / 3).max(3)),
        Constraint::Min(1),
    ])
    .areas(area);

    draw_header(frame, run, header_area);
    draw_step_list(frame, app, list_area);
    draw_step_body(frame, app, body_area);
}

fn draw_header(frame: &mut Frame, run: &StepExecutionSimulator, area: Rect) {
    let case = run.case();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE2));
    let line = Line::from(vec![
        Span::styled(format!("{} ", case.id), Style::default().fg(theme::OVERLAY0)),
        Span::styled(&case.title, Style::default().fg(theme::TEXT).bold()),
        Span::raw("  "),
        Span::styled(format!("[{}]", case.module), Style::default().fg(theme::BLUE)),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", case.priority.label()),
            Style::default().fg(case.priority.color()),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_step_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Test Steps ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BLUE));

    app.step_viewport_height = block.inner(area).height as usize;
    app.adjust_step_scroll();

    let Some(run) = app.run.as_ref() else {
        return;
    };

    let end = (app.step_scroll_offset + app.step_viewport_height).min(run.step_count());
    let items: Vec<ListItem> = (app.step_scroll_offset..end)
        .map(|i| {
            let step = &run.case().steps[i];
            let status = run.state().display_status(i);
            let selected = i == app.selected_step;

            let line = Line::from(vec![
                Span::styled(format!("{} ", status.icon()), Style::default().fg(status.color())),
                Span::styled(
                    format!("Step {:<3}", step.number),
                    Style::default().fg(theme::TEXT).bold(),
                ),
                Span::styled(
                    format!("{:<8} ", status.label()),
                    Style::default().fg(status.color()),
                ),
                Span::styled(&step.action, Style::default().fg(theme::SUBTEXT1)),
            ]);

            let item = ListItem::new(line);
            if selected {
                item.style(Style::default().bg(theme::SURFACE1))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_step_body(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(run) = app.run.as_ref() else {
        return;
    };
    let index = app.selected_step;
    let Some(step) = run.case().steps.get(index) else {
        return;
    };
    let status = run.state().display_status(index);

    let block = Block::default()
        .title(format!(" Step {} ", step.number))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(status_border(status)));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = step_lines(run, step, index, app);
    let content = Text::from(lines);

    let max_scroll = (content.height() as u16).saturating_sub(inner.height);
    let scroll = app.detail_scroll_offset.min(max_scroll);

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, inner);

    app.detail_scroll_offset = scroll;
}

fn status_border(status: DisplayStatus) -> Color {
    match status {
        DisplayStatus::Pending | DisplayStatus::Skipped => theme::SURFACE2,
        other => other.color(),
    }
}

fn labeled<'a>(label: &'a str, value: &'a str, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(theme::TEXT).bold()),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn step_lines<'a>(
    run: &'a StepExecutionSimulator,
    step: &'a Step,
    index: usize,
    app: &'a App,
) -> Vec<Line<'a>> {
    let mut lines = vec![labeled("Action: ", &step.action, theme::SUBTEXT1)];
    if let Some(data) = &step.data {
        lines.push(labeled("Test Data: ", data, theme::SUBTEXT1));
    }
    lines.push(labeled("Expected Result: ", &step.expected, theme::SUBTEXT1));

    if !step.inputs.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "━━ Inputs ━━",
            Style::default().fg(theme::YELLOW),
        )));

        for (fi, field) in step.inputs.iter().enumerate() {
            let editing = matches!(
                &app.mode,
                InputMode::EditField { step: s, field: f } if *s == index && *f == field.name
            );
            let focused = fi == app.selected_field;
            let marker = if focused { "› " } else { "  " };
            let required = if field.required { "*" } else { " " };

            let value: Span = if editing {
                Span::styled(
                    format!("{}│", app.editor.value()),
                    Style::default().fg(theme::TEXT).bg(theme::SURFACE0),
                )
            } else {
                match run.input(index, &field.name).ok().flatten() {
                    Some(v) if !v.is_empty() => Span::styled(v, Style::default().fg(theme::TEAL)),
                    _ => Span::styled(
                        field.placeholder.as_str(),
                        Style::default().fg(theme::OVERLAY0).italic(),
                    ),
                }
            };

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme::BLUE)),
                Span::styled(
                    format!("{}{}: ", field.label, required),
                    Style::default().fg(theme::SUBTEXT0),
                ),
                value,
            ]));
        }
    }

    if let Ok(Some(result)) = run.result(index) {
        let color = match run.verdict(index) {
            Ok(Some(Verdict::Pass)) => theme::GREEN,
            _ => theme::RED,
        };
        lines.push(Line::from(""));
        lines.push(labeled("Result: ", result, color));
    }

    let note_editing = app.mode == InputMode::EditNote { step: index };
    if note_editing {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Notes: ", Style::default().fg(theme::RED).bold()),
            Span::styled(
                format!("{}│", app.editor.value()),
                Style::default().fg(theme::TEXT).bg(theme::SURFACE0),
            ),
        ]));
    } else if let Ok(Some(note)) = run.note(index) {
        lines.push(Line::from(""));
        lines.push(labeled("Notes: ", note, theme::PEACH));
    } else if run.state().display_status(index) == DisplayStatus::Failed {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press [n] to enter failure notes or defect details...",
            Style::default().fg(theme::OVERLAY0).italic(),
        )));
    }

    lines
}
