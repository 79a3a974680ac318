use crate::app::state::{MARGIN_RANGE, YOUTH_RANGE};
use crate::app::{App, SidebarField};
use crate::ui::widgets::legend::render_legend;
use crate::ui::widgets::popup::{centered_rect, clear, render_hint};
use crate::ui::widgets::precinct_map::render_precinct_map;
use crate::ui::widgets::precinct_popup::render_precinct_popup;
use precinct_map_tui::{filters, format};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const SIDEBAR_WIDTH: u16 = 38;
const SLIDER_WIDTH: usize = 16;

pub struct MainLayout {
    pub sidebar: Rect,
    pub map: Rect,
    pub status: Rect,
    pub shortcuts: Rect,
}

pub fn main_layout(screen: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Sidebar + map
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(screen.inner(Margin::new(1, 0)));

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    MainLayout {
        sidebar: columns[0],
        map: columns[1],
        status: rows[1],
        shortcuts: rows[2],
    }
}

/// Canvas area of the map (inside its border). Mouse hit testing uses the
/// same rectangle the renderer draws into.
pub fn map_area(screen: Rect) -> Rect {
    main_layout(screen).map.inner(Margin::new(1, 1))
}

pub fn popup_area(map: Rect) -> Rect {
    centered_rect(55, 70, (44, 14), map)
}

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let layout = main_layout(f.area());

    render_sidebar(app, f, layout.sidebar);
    render_precinct_map(app, f, layout.map);

    if let Some(properties) = app.selection.current() {
        render_precinct_popup(properties, f, popup_area(map_area(f.area())));
    }

    render_status_section(app, f, layout.status);
    render_shortcuts(f, layout.shortcuts);

    if app.show_help {
        render_help_popup(app, f, f.area());
    }
}

fn render_sidebar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Filters
            Constraint::Length(7),  // Legend
            Constraint::Length(3),  // Export
            Constraint::Min(0),
        ])
        .split(area);

    render_filters(app, f, sections[0]);
    render_legend(f, sections[1]);
    render_export(f, sections[2]);
}

fn render_filters(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Filters ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let live = app.filters.live();
    let district = if app.districts.is_loading() && live.district.is_none() {
        "Loading districts…".to_string()
    } else {
        app.live_district_label()
    };

    let mut lines = vec![
        field_line("District", format!("‹ {district} ›"), app.focus == SidebarField::District),
        field_line(
            "Min. youth share",
            format::whole_percent(live.youth_min, false),
            app.focus == SidebarField::YouthMin,
        ),
        slider_line(live.youth_min, YOUTH_RANGE),
        field_line(
            "Min. Dem margin",
            format::whole_percent(live.margin_floor, true),
            app.focus == SidebarField::MarginFloor,
        ),
        slider_line(live.margin_floor, MARGIN_RANGE),
        TextLine::from(""),
    ];

    if app.filters.has_pending() {
        lines.push(TextLine::from(Span::styled(
            "● Unapplied changes (Enter)",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(TextLine::from(Span::styled(
            "Filters in effect",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines)).block(block);
    f.render_widget(paragraph, area);
}

fn field_line(label: &str, value: String, focused: bool) -> TextLine<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    TextLine::from(vec![
        Span::styled(format!("{marker}{label}: "), label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn slider_line(value: f64, range: (f64, f64)) -> TextLine<'static> {
    let (lo, hi) = range;
    let fraction = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = (fraction * SLIDER_WIDTH as f64).round() as usize;

    TextLine::from(vec![
        Span::raw("  "),
        Span::styled("━".repeat(filled), Style::default().fg(Color::Blue)),
        Span::styled("●", Style::default().fg(Color::White)),
        Span::styled(
            "─".repeat(SLIDER_WIDTH - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_export(f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "e",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Export CSV (applied filters)", Style::default()),
    ]))
    .block(block);
    f.render_widget(paragraph, area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let count = app.map.layers().map_or(0, |layers| layers.features().len());
    let query = filters::encode(&app.filters.applied());
    let status_text = Text::from(status_line(&app.status_message, &query, count));

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

/// Latest message (if any) followed by the applied query and precinct count,
/// which stay visible after a message is shown.
fn status_line<'a>(message: &'a str, query: &str, count: usize) -> TextLine<'a> {
    let summary = Span::styled(
        format!("Applied: {query}  ·  {count} precincts"),
        Style::default().fg(Color::Gray),
    );

    if message.is_empty() {
        return TextLine::from(summary);
    }

    let style = if message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    TextLine::from(vec![
        Span::styled(message, style),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        summary,
    ])
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::Gray);

    let shortcuts = TextLine::from(vec![
        Span::styled("Tab", key),
        Span::styled(" focus  ", text),
        Span::styled("←/→", key),
        Span::styled(" adjust  ", text),
        Span::styled("Enter", key),
        Span::styled(" apply  ", text),
        Span::styled("e", key),
        Span::styled(" export  ", text),
        Span::styled("hjkl", key),
        Span::styled(" pan  ", text),
        Span::styled("+/-", key),
        Span::styled(" zoom  ", text),
        Span::styled("F1", key),
        Span::styled(" help  ", text),
        Span::styled("q", key),
        Span::styled(" quit", text),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}

fn render_help_popup(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 80, (50, 24), area);
    clear(f, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines(app)))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    render_hint(f, popup_area, "Press F1, ? or Esc to close");
}

fn build_help_lines(app: &App) -> Vec<TextLine<'static>> {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let entry = |keys: &'static str, action: &'static str| {
        TextLine::from(vec![
            Span::styled(format!("{keys:<12}"), key),
            Span::raw(action),
        ])
    };

    vec![
        TextLine::from(Span::styled("Precinct Map", heading)),
        TextLine::from(""),
        TextLine::from(Span::styled("Filters", heading)),
        entry("Tab / ↑ ↓", "Move between district and sliders"),
        entry("← →", "Change the focused filter (not yet applied)"),
        entry("Enter", "Apply filters and refresh the map"),
        entry("e", "Open the CSV export for the applied filters"),
        TextLine::from(""),
        TextLine::from(Span::styled("Map", heading)),
        entry("h j k l", "Pan west / south / north / east"),
        entry("+ / -", "Zoom in / out (mouse wheel too)"),
        entry("0", "Reset the view to California"),
        entry("Click", "Inspect the precinct under the pointer"),
        entry("Esc / x", "Close the precinct popup"),
        entry("r", "Reload the map layer"),
        entry("q", "Quit"),
        TextLine::from(""),
        TextLine::from(Span::styled("Connection", heading)),
        TextLine::from(format!("Data service: {}", app.config.api_url)),
        TextLine::from(format!("Map token: {}", app.config.redacted_token())),
        TextLine::from(format!("Log file: {}", app.config.log_path.display())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_area_sits_right_of_sidebar_inside_border() {
        let screen = Rect::new(0, 0, 120, 40);
        let layout = main_layout(screen);
        let map = map_area(screen);

        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(map.x, layout.map.x + 1);
        assert_eq!(map.y, layout.map.y + 1);
        assert!(map.right() < layout.map.right());
        assert_eq!(layout.status.height, 3);
    }

    #[test]
    fn status_keeps_applied_summary_next_to_message() {
        let quiet = status_line("", "youth_min=0.15&margin_floor=0", 12);
        assert_eq!(quiet.spans.len(), 1);
        assert_eq!(
            quiet.spans[0].content,
            "Applied: youth_min=0.15&margin_floor=0  ·  12 precincts"
        );

        let after_apply = status_line("Filters applied", "youth_min=0.2&margin_floor=0", 3);
        assert_eq!(after_apply.spans[0].content, "Filters applied");
        assert_eq!(after_apply.spans[0].style.fg, Some(Color::Green));
        assert!(after_apply.spans[2].content.ends_with("3 precincts"));

        let failed = status_line("Error: timeout", "youth_min=0.2&margin_floor=0", 3);
        assert_eq!(failed.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn slider_marks_position() {
        let low = slider_line(0.0, YOUTH_RANGE);
        assert_eq!(low.spans[1].content, "");

        let high = slider_line(0.5, YOUTH_RANGE);
        assert_eq!(high.spans[1].content.chars().count(), SLIDER_WIDTH);
        assert_eq!(high.spans[3].content, "");
    }
}
