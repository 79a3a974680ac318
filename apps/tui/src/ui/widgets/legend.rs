use precinct_map_tui::format::MISSING;
use precinct_map_tui::map::{tier_fill_color, DEFAULT_FILL_COLOR};
use precinct_map_tui::Tier;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const SWATCH: &str = "██ ";

pub fn render_legend(f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Score tiers ")
        .title_style(Style::default().fg(Color::Magenta))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    f.render_widget(Paragraph::new(Text::from(legend_lines())).block(block), area);
}

fn legend_lines() -> Vec<TextLine<'static>> {
    let mut lines: Vec<TextLine<'static>> = Tier::ALL
        .into_iter()
        .map(|tier| {
            TextLine::from(vec![
                Span::styled(SWATCH, Style::default().fg(tier_fill_color(Some(tier.as_str())))),
                Span::styled(format!("{:<10}", tier.label()), Style::default().fg(Color::White)),
                Span::styled(tier.description(), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    lines.push(TextLine::from(vec![
        Span::styled(SWATCH, Style::default().fg(DEFAULT_FILL_COLOR)),
        Span::styled(format!("{MISSING:<10}"), Style::default().fg(Color::White)),
        Span::styled("Unclassified", Style::default().fg(Color::Gray)),
    ]));

    lines
}
