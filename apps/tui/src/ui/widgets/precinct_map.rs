use std::ops::Range;

use precinct_map_tui::map::{Cursor, LayerFeature};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

use crate::app::App;

/// Braille dots per terminal cell.
const DOTS_PER_CELL: (u16, u16) = (2, 4);

pub fn render_precinct_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let border = if app.map.cursor() == Cursor::Pointer {
        Color::Yellow
    } else {
        Color::Blue
    };

    let block = Block::default()
        .title(" Precincts ")
        .title_style(Style::default().fg(border))
        .title_bottom(format!(" zoom {:.1} ", app.viewport.zoom))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    let viewport = app.viewport;
    let x_bounds = viewport.x_bounds();
    let y_bounds = viewport.y_bounds(inner);
    let resolution = dot_resolution(inner);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            let Some(layers) = app.map.layers() else {
                return;
            };

            for feature in layers.features() {
                let coords = fill_points(feature, x_bounds, y_bounds, resolution);
                if !coords.is_empty() {
                    ctx.draw(&Points {
                        coords: &coords,
                        color: layers.fill.color(&feature.properties),
                    });
                }
            }

            if layers.outline.visible_at(viewport.zoom) {
                ctx.layer();
                for feature in layers.features() {
                    for (x1, y1, x2, y2) in outline_segments(feature) {
                        ctx.draw(&CanvasLine {
                            x1,
                            y1,
                            x2,
                            y2,
                            color: layers.outline.color,
                        });
                    }
                }
            }
        });

    f.render_widget(canvas, area);

    if app.map.is_loading() {
        render_loading(app, f, inner);
    } else if !app.map.is_mounted() {
        let paragraph = Paragraph::new(Span::styled(
            "Map not mounted. Press r to load it.",
            Style::default().fg(Color::Gray),
        ));
        f.render_widget(paragraph, inner);
    }
}

fn render_loading(app: &App, f: &mut Frame<'_>, inner: Rect) {
    if inner.height == 0 || inner.width < 4 {
        return;
    }

    let area = Rect {
        x: inner.x + 1,
        y: inner.y,
        width: (inner.width - 2).min(24),
        height: 1,
    };

    let throbber = Throbber::default()
        .label("Loading precincts")
        .style(Style::default().fg(Color::Yellow))
        .throbber_set(BRAILLE_SIX);
    f.render_stateful_widget(throbber, area, &mut app.throbber.clone());
}

/// Braille dot grid (columns, rows) for a canvas area.
fn dot_resolution(inner: Rect) -> (usize, usize) {
    (
        usize::from(inner.width) * usize::from(DOTS_PER_CELL.0),
        usize::from(inner.height) * usize::from(DOTS_PER_CELL.1),
    )
}

/// Canvas dots that fall inside the feature, sampled at dot centres of a
/// `resolution` grid over the visible bounds. A feature smaller than a dot
/// still gets one dot at its bounding-box centre when that is visible.
pub fn fill_points(
    feature: &LayerFeature,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    resolution: (usize, usize),
) -> Vec<(f64, f64)> {
    let Some(bbox) = feature.bbox() else {
        return Vec::new();
    };
    let (cols, rows) = resolution;
    if cols == 0 || rows == 0 {
        return Vec::new();
    }

    let (min, max) = (bbox.min(), bbox.max());
    let (col_range, dx) = grid_span(min.x, max.x, x_bounds, cols);
    let (row_range, dy) = grid_span(min.y, max.y, y_bounds, rows);

    let mut coords = Vec::new();
    for col in col_range {
        #[allow(clippy::cast_precision_loss)]
        let x = (col as f64 + 0.5).mul_add(dx, x_bounds[0]);
        for row in row_range.clone() {
            #[allow(clippy::cast_precision_loss)]
            let y = (row as f64 + 0.5).mul_add(dy, y_bounds[0]);
            if feature.contains(x, y) {
                coords.push((x, y));
            }
        }
    }

    if coords.is_empty() {
        let centre = bbox.center();
        let visible = (x_bounds[0]..=x_bounds[1]).contains(&centre.x)
            && (y_bounds[0]..=y_bounds[1]).contains(&centre.y);
        if visible {
            coords.push((centre.x, centre.y));
        }
    }

    coords
}

/// Grid cells covering `[lo, hi]` along one axis, and the cell size.
fn grid_span(lo: f64, hi: f64, bounds: [f64; 2], cells: usize) -> (Range<usize>, f64) {
    #[allow(clippy::cast_precision_loss)]
    let total = cells as f64;
    let step = (bounds[1] - bounds[0]) / total;
    if step <= 0.0 {
        return (0..0, step);
    }

    let first = ((lo - bounds[0]) / step).floor().clamp(0.0, total);
    let last = ((hi - bounds[0]) / step).ceil().clamp(0.0, total);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let range = (first as usize)..(last as usize);
    (range, step)
}

fn outline_segments(feature: &LayerFeature) -> Vec<(f64, f64, f64, f64)> {
    let Some(shape) = feature.shape() else {
        return Vec::new();
    };

    shape
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .flat_map(|ring| ring.lines())
        .map(|line| (line.start.x, line.start.y, line.end.x, line.end.y))
        .collect()
}
