/// Rendering — draws the current [`AppState`] into a ratatui frame.
///
/// Pure presentation: reads state, never mutates it.
use crate::state::{AppPhase, AppState};
use dusty_core::model::size::{format_count, format_size};
use dusty_core::DirectoryView;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::time::Instant;

/// Width of the proportional bar next to each entry.
const BAR_WIDTH: usize = 20;

/// Lines used by everything except the listing (title, summary, gaps, footer).
const CHROME_HEIGHT: u16 = 5;

const HELP_TEXT: &str =
    "  ↑/↓: Navigate | ←/→: Enter/Exit | d: Delete | s: Sort | Home: Root | q: Quit";

// ── Palette ───────────────────────────────────────────────────────────────────

fn title_style() -> Style {
    Style::default()
        .fg(Color::Rgb(0xFA, 0xFA, 0xFA))
        .bg(Color::Rgb(0x7D, 0x56, 0xF4))
        .add_modifier(Modifier::BOLD)
}

fn dir_style() -> Style {
    Style::default()
        .fg(Color::Rgb(0x04, 0xB5, 0x75))
        .add_modifier(Modifier::BOLD)
}

fn file_style() -> Style {
    Style::default().fg(Color::Rgb(0xFA, 0xFA, 0xFA))
}

fn size_style() -> Style {
    Style::default()
        .fg(Color::Rgb(0xFF, 0xA5, 0x00))
        .add_modifier(Modifier::BOLD)
}

fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(0x3A, 0x3A, 0x3A))
        .fg(Color::White)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

fn help_style() -> Style {
    Style::default()
        .fg(Color::Rgb(0x66, 0x66, 0x66))
        .add_modifier(Modifier::ITALIC)
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Draw one frame.
pub fn render(frame: &mut Frame, state: &AppState, now: Instant) {
    let area = frame.area();
    match state.phase {
        AppPhase::Scanning => render_scanning(frame, area, state, now),
        AppPhase::Failed => render_failed(frame, area, state),
        AppPhase::Browsing => match state.navigator.as_ref() {
            Some(nav) => render_browser(frame, area, state, &nav.view(), now),
            None => frame.render_widget(Paragraph::new("\n  No data available"), area),
        },
    }
}

fn render_scanning(frame: &mut Frame, area: Rect, state: &AppState, now: Instant) {
    let mut lines = vec![
        Line::default(),
        Line::from(format!(
            "  {} Scanning directories... {:.1}s",
            state.scan_spinner(now),
            state.elapsed_secs(now)
        )),
        Line::default(),
    ];

    match state.progress() {
        Some(progress) => {
            lines.push(Line::from(format!(
                "  Files: {} | Directories: {}",
                format_count(progress.files_scanned),
                format_count(progress.dirs_scanned)
            )));
            lines.push(Line::from(format!(
                "  Current size: {}",
                format_size(progress.total_size)
            )));
            lines.push(Line::default());

            if !progress.largest.is_empty() {
                lines.push(Line::from("  Largest items found:"));
                for entry in &progress.largest {
                    let suffix = if entry.is_dir { "/" } else { "" };
                    lines.push(Line::from(vec![
                        Span::raw("    "),
                        Span::styled(format!("{:>10}", format_size(entry.size)), size_style()),
                        Span::raw(format!("  {}{suffix}", entry.name)),
                    ]));
                }
            }
        }
        None => lines.push(Line::from("  Files: 0 | Directories: 0")),
    }

    lines.push(Line::default());
    lines.push(Line::from("  Press 'q' to quit"));
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_failed(frame: &mut Frame, area: Rect, state: &AppState) {
    let message = state
        .scan_error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown error".to_string());
    let lines = vec![
        Line::default(),
        Line::styled(format!("  Error: {message}"), error_style()),
        Line::default(),
        Line::styled("  Press 'q' to quit", help_style()),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_browser(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &DirectoryView,
    now: Instant,
) {
    let [title, summary, _, list, _, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::styled(
            format!(" Dusty - {} ", view.path.display()),
            title_style(),
        )),
        title,
    );
    frame.render_widget(
        Paragraph::new(format!(
            "Total Size: {} | Sort: {}",
            format_size(view.size),
            view.sort_mode
        )),
        summary,
    );

    let max_items = visible_rows(area.height);
    let start = first_visible_row(view.cursor, max_items);
    let rows: Vec<Line> = view
        .entries
        .iter()
        .enumerate()
        .skip(start)
        .take(max_items)
        .map(|(i, entry)| {
            let name = if entry.is_dir {
                Span::styled(format!("{}/", entry.name), dir_style())
            } else {
                Span::styled(entry.name.to_string(), file_style())
            };
            let mut spans = vec![
                Span::raw("  "),
                Span::styled(format!("{:>10}", format_size(entry.size)), size_style()),
                Span::raw(format!(" {:5.1}% [{}] ", entry.percent, bar(entry.percent))),
                name,
            ];
            if entry.has_error {
                spans.push(Span::styled(" (unreadable)", error_style()));
            }
            let line = Line::from(spans);
            if i == view.cursor {
                line.style(selected_style())
            } else {
                line
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(rows), list);

    let footer_line = if let Some(spinner) = state.delete_spinner(now) {
        let name = state
            .delete_handle
            .as_ref()
            .map(|h| h.name.as_str())
            .unwrap_or_default();
        Line::styled(format!("{spinner} Deleting {name}..."), size_style())
    } else if let Some(status) = state.active_status(now) {
        Line::from(status.to_string())
    } else {
        Line::styled(HELP_TEXT, help_style())
    };
    frame.render_widget(Paragraph::new(footer_line), footer);
}

/// Filled/empty bar for a 0–100 percentage.
fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0 * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Listing rows that fit on screen, never fewer than five.
fn visible_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_HEIGHT).max(5) as usize
}

/// First row to draw so that the cursor stays on screen.
fn first_visible_row(cursor: usize, max_items: usize) -> usize {
    if cursor >= max_items {
        cursor - max_items + 1
    } else {
        0
    }
}
