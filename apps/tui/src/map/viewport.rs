use ratatui::layout::Rect;

/// California centre.
pub const DEFAULT_CENTER: (f64, f64) = (-119.4179, 36.7783);
pub const DEFAULT_ZOOM: f64 = 5.5;
pub const MIN_ZOOM: f64 = 4.0;
pub const MAX_ZOOM: f64 = 14.0;
/// South-west and north-east corners the centre may not leave.
pub const MAX_BOUNDS: [(f64, f64); 2] = [(-128.0, 22.0), (-64.0, 52.0)];

const ZOOM_STEP: f64 = 0.5;
const PAN_FRACTION: f64 = 0.2;

/// Visible region of the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: (f64, f64),
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    /// Half of the visible longitude span.
    pub fn half_width(&self) -> f64 {
        180.0 / 2f64.powf(self.zoom - 1.0)
    }

    /// Half of the visible latitude span for an area. Terminal cells are about
    /// twice as tall as wide and a degree of longitude shrinks with latitude.
    pub fn half_height(&self, area: Rect) -> f64 {
        if area.width == 0 {
            return self.half_width();
        }
        let cell_aspect = f64::from(area.height) * 2.0 / f64::from(area.width);
        self.half_width() * cell_aspect * self.center.1.to_radians().cos()
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.half_width();
        [self.center.0 - half, self.center.0 + half]
    }

    pub fn y_bounds(&self, area: Rect) -> [f64; 2] {
        let half = self.half_height(area);
        [self.center.1 - half, self.center.1 + half]
    }

    /// Longitude/latitude under the centre of a terminal cell, or `None` when
    /// the cell is outside `area`.
    pub fn lon_lat_at(&self, area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }

        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds(area);
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);

        Some((fx.mul_add(east - west, west), fy.mul_add(south - north, north)))
    }

    /// Move by a fraction of the visible span; `dx`/`dy` are -1, 0 or 1.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let step = self.half_width() * 2.0 * PAN_FRACTION;
        self.center.0 += dx * step;
        self.center.1 += dy * step;
        self.clamp();
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn clamp(&mut self) {
        let [(west, south), (east, north)] = MAX_BOUNDS;
        self.center.0 = self.center.0.clamp(west, east);
        self.center.1 = self.center.1.clamp(south, north);
    }
}
