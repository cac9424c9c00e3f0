use aqualan_core::cycle::next_delivery;
use aqualan_core::scheduler::weekday_name;
use aqualan_core::{Cadence, CycleKind, MatchKind, RouteEntry};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::{App, Lookup, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let source = app
        .source
        .as_ref()
        .map_or_else(|| "built-in routes".to_owned(), |source| source.describe());
    let header = Paragraph::new(format!("Aqualan – delivery dates · {source}"))
        .block(Block::default().borders(Borders::ALL).title("Aqualan"));
    frame.render_widget(header, *header_area);

    let now = Local::now().naive_local();
    match app.screen {
        Screen::Lookup => draw_lookup(frame, app, *content_area),
        Screen::Routes => draw_routes(frame, app, *content_area, now),
    }

    let nav_hint = match app.screen {
        Screen::Lookup => "Type a city · Enter estimate · Esc clear/quit · Tab routes · Ctrl-R reload",
        Screen::Routes => "↑/↓ move · ←/→ switch table · r reload · Tab lookup · q/Esc quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = app.error_message.as_ref().or(app.info_message.as_ref()) {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else if app.info_message.is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_lookup(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // result
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, result_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.city_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("City or address (Enter)"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let lines = app
        .lookup
        .as_ref()
        .map_or_else(|| vec![Line::from("No lookup yet.")], lookup_lines);

    let result = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Next delivery"))
        .wrap(Wrap { trim: true });
    frame.render_widget(result, *result_area);
}

fn lookup_lines(lookup: &Lookup) -> Vec<Line<'static>> {
    let headline_style = if lookup.estimate.found {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let mut lines = vec![
        Line::from(format!("“{}”", lookup.city)),
        Line::styled(lookup.estimate.message.clone(), headline_style),
    ];

    if let (Some(key), Some(table), Some(matched_by)) =
        (&lookup.key, lookup.table, lookup.matched_by)
    {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Route:   {key}")));
        lines.push(Line::from(format!("Table:   {}", table_label(table))));
        lines.push(Line::from(format!("Matched: {}", match_label(matched_by))));
    }
    lines
}

fn draw_routes(frame: &mut Frame<'_>, app: &App, area: Rect, now: NaiveDateTime) {
    let routes = app.visible_routes();
    let title = format!(
        "{} routes ({}) · ←/→ to switch",
        table_label(app.route_table),
        routes.len()
    );

    let rows = routes.iter().map(|entry| {
        let next = next_delivery(entry, now)
            .map_or_else(|| "-".to_owned(), date_label);
        Row::new(vec![
            Cell::from(entry.key().to_owned()),
            Cell::from(cadence_label(entry.cadence())),
            Cell::from(weekdays_label(entry)),
            Cell::from(next),
        ])
    });

    let column_widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(30),
        Constraint::Length(22),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Route", "Cadence", "Days", "Next delivery"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    if !routes.is_empty() {
        state.select(Some(app.route_list_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn table_label(kind: CycleKind) -> &'static str {
    match kind {
        CycleKind::Biweekly => "Biweekly",
        CycleKind::Weekly => "Weekly",
    }
}

fn match_label(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::Substring => "substring",
        MatchKind::TokenOverlap => "shared word",
    }
}

fn cadence_label(cadence: Cadence) -> String {
    match cadence {
        Cadence::Weekly => "weekly".to_owned(),
        Cadence::Biweekly(parity) => parity.to_string(),
    }
}

fn weekdays_label(entry: &RouteEntry) -> String {
    entry
        .weekdays()
        .iter()
        .map(|day| weekday_name(*day))
        .collect::<Vec<_>>()
        .join(", ")
}

fn date_label(date: NaiveDate) -> String {
    format!("{} {}", weekday_name(date.weekday()), date.format("%d/%m/%Y"))
}
