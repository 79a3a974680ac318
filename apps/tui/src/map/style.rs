use ratatui::style::Color;

/// Fill colour for precincts whose tier is null or not in `TIER_FILL`.
pub const DEFAULT_FILL_COLOR: Color = Color::Rgb(0xe0, 0xe0, 0xe0);

/// Checked in order, first match wins.
pub const TIER_FILL: [(&str, Color); 4] = [
    ("priority", Color::Rgb(0x1a, 0x23, 0x7e)),
    ("target", Color::Rgb(0x39, 0x49, 0xab)),
    ("watchlist", Color::Rgb(0x79, 0x86, 0xcb)),
    ("low", Color::Rgb(0xc5, 0xca, 0xe9)),
];

pub const OUTLINE_COLOR: Color = Color::Rgb(0xff, 0xff, 0xff);

/// Outlines swamp the fill at low zoom on a braille canvas.
pub const OUTLINE_MIN_ZOOM: f64 = 8.0;

pub fn tier_fill_color(tier: Option<&str>) -> Color {
    tier.and_then(|tier| TIER_FILL.iter().find(|(name, _)| *name == tier))
        .map_or(DEFAULT_FILL_COLOR, |(_, color)| *color)
}
