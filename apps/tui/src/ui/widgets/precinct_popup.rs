use precinct_map_tui::domain::{PrecinctProperties, Tier};
use precinct_map_tui::format;
use precinct_map_tui::map::tier_fill_color;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Row, Table};
use ratatui::Frame;

use super::popup::{clear, render_hint};

pub fn render_precinct_popup(properties: &PrecinctProperties, f: &mut Frame<'_>, area: Rect) {
    clear(f, area);

    let title = TextLine::from(vec![
        Span::styled(
            format!(" {} County · ", format::text(&properties.county_name)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("{} ", properties.precinct_id),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        tier_badge(properties.tier()),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let rows = stat_rows(properties).into_iter().map(|(label, value)| {
        Row::new(vec![
            Span::styled(label, Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(8)]).block(block);
    f.render_widget(table, area);

    render_hint(f, area, "Esc or x to close");
}

/// Tier in its fill colour, or a placeholder in the default colour.
fn tier_badge(tier: Option<Tier>) -> Span<'static> {
    let fg = match tier {
        Some(Tier::Priority | Tier::Target | Tier::Watchlist) => Color::White,
        Some(Tier::Low) | None => Color::Black,
    };

    Span::styled(
        format!(" {} ", format::tier_label(tier).to_uppercase()),
        Style::default()
            .fg(fg)
            .bg(tier_fill_color(tier.map(Tier::as_str)))
            .add_modifier(Modifier::BOLD),
    )
}

fn stat_rows(p: &PrecinctProperties) -> Vec<(&'static str, String)> {
    vec![
        ("Youth share (18–29)", format::percent(p.youth_share)),
        ("Dem margin", format::signed_percent(p.dem_margin)),
        ("Composite score", format::score(p.score)),
        ("Dem %", format::percent(p.dem_pct)),
        ("Total pop.", format::count(p.total_pop)),
        ("Pop. 18–29", format::count(p.pop_18_29)),
        (
            "Dem / Rep votes",
            format!("{} / {}", format::count(p.dem_votes), format::count(p.rep_votes)),
        ),
        ("Total votes", format::count(p.total_votes)),
        ("CD", format::optional_district(p.cd_number)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use precinct_map_tui::format::MISSING;
    use precinct_map_tui::map::DEFAULT_FILL_COLOR;

    #[test]
    fn absent_values_show_placeholder() {
        let rows = stat_rows(&PrecinctProperties {
            precinct_id: "06019-42".to_string(),
            ..PrecinctProperties::default()
        });

        assert!(rows
            .iter()
            .filter(|(label, _)| *label != "Dem / Rep votes")
            .all(|(_, value)| value == MISSING));
    }

    #[test]
    fn populated_values_are_formatted() {
        let rows = stat_rows(&PrecinctProperties {
            precinct_id: "06019-42".to_string(),
            youth_share: Some(0.234),
            dem_margin: Some(0.05),
            score: Some(0.8123),
            total_pop: Some(12_345),
            cd_number: Some(7),
            ..PrecinctProperties::default()
        });

        let value = |name: &str| {
            rows.iter()
                .find(|(label, _)| *label == name)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(value("Youth share (18–29)").as_deref(), Some("23.4%"));
        assert_eq!(value("Dem margin").as_deref(), Some("+5.0%"));
        assert_eq!(value("Composite score").as_deref(), Some("0.812"));
        assert_eq!(value("Total pop.").as_deref(), Some("12,345"));
        assert_eq!(value("CD").as_deref(), Some("CA-07"));
    }

    #[test]
    fn unclassified_badge_uses_default_colour() {
        let badge = tier_badge(None);
        assert_eq!(badge.content.trim(), MISSING);
        assert_eq!(badge.style.bg, Some(DEFAULT_FILL_COLOR));

        let badge = tier_badge(Some(Tier::Priority));
        assert_eq!(badge.content.trim(), "PRIORITY");
    }
}
