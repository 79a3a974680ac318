use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

/// Popup covering a percentage of `area`, grown to at least `min`
/// (width, height) when `area` has room for it.
pub fn centered_rect(percent_x: u16, percent_y: u16, min: (u16, u16), area: Rect) -> Rect {
    let scaled = |len: u16, percent: u16| {
        u16::try_from(u32::from(len) * u32::from(percent.min(100)) / 100).unwrap_or(len)
    };

    let width = scaled(area.width, percent_x).max(min.0).min(area.width);
    let height = scaled(area.height, percent_y).max(min.1).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Blank the popup's area so the map underneath does not bleed through.
pub fn clear(f: &mut Frame<'_>, area: Rect) {
    f.render_widget(Clear, area);
}

/// One gray line just above the popup's bottom border.
pub fn render_hint(f: &mut Frame<'_>, popup: Rect, hint: &str) {
    if popup.height < 3 {
        return;
    }

    let hint_area = Rect {
        x: popup.x + 1,
        y: popup.y + popup.height - 2,
        width: popup.width.saturating_sub(2),
        height: 1,
    };

    let paragraph = Paragraph::new(Span::styled(hint, Style::default().fg(Color::Gray)))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, hint_area);
}
