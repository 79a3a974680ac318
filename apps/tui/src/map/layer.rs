use geo::{BoundingRect, Contains, Coord, LineString, MultiPolygon, Point, Polygon, Rect};
use ratatui::style::Color;

use super::style::{tier_fill_color, OUTLINE_COLOR, OUTLINE_MIN_ZOOM};
use crate::domain::{Geometry, PrecinctCollection, PrecinctFeature, PrecinctProperties, Position};

/// A precinct as held by the map source: properties plus projected-ready shape.
#[derive(Debug, Clone)]
pub struct LayerFeature {
    pub properties: PrecinctProperties,
    shape: Option<MultiPolygon<f64>>,
    bbox: Option<Rect<f64>>,
}

impl LayerFeature {
    fn from_feature(feature: PrecinctFeature) -> Self {
        let shape = feature.geometry.as_ref().and_then(shape_of);
        let bbox = shape.as_ref().and_then(|shape| shape.bounding_rect());
        Self {
            properties: feature.properties,
            shape,
            bbox,
        }
    }

    pub const fn shape(&self) -> Option<&MultiPolygon<f64>> {
        self.shape.as_ref()
    }

    pub const fn bbox(&self) -> Option<&Rect<f64>> {
        self.bbox.as_ref()
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (Some(shape), Some(bbox)) = (&self.shape, &self.bbox) else {
            return false;
        };

        let min = bbox.min();
        let max = bbox.max();
        if lon < min.x || lon > max.x || lat < min.y || lat > max.y {
            return false;
        }

        shape.contains(&Point::new(lon, lat))
    }
}

/// Tier-coloured fill derived from the source
#[derive(Debug, Clone, Copy, Default)]
pub struct FillLayer;

impl FillLayer {
    pub fn color(self, properties: &PrecinctProperties) -> Color {
        tier_fill_color(properties.tier.as_deref())
    }
}

/// Fixed outline styling, independent of filters and tiers.
#[derive(Debug, Clone, Copy)]
pub struct OutlineLayer {
    pub color: Color,
    pub min_zoom: f64,
}

impl OutlineLayer {
    pub fn visible_at(self, zoom: f64) -> bool {
        zoom >= self.min_zoom
    }
}

impl Default for OutlineLayer {
    fn default() -> Self {
        Self {
            color: OUTLINE_COLOR,
            min_zoom: OUTLINE_MIN_ZOOM,
        }
    }
}

/// The precinct source and the two sub-layers drawn from it.
#[derive(Debug, Default)]
pub struct PrecinctLayers {
    features: Vec<LayerFeature>,
    pub fill: FillLayer,
    pub outline: OutlineLayer,
}

impl PrecinctLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole feature set. The new list is built before it is
    /// swapped in, so a render never sees a partially loaded source.
    pub fn set_data(&mut self, collection: PrecinctCollection) {
        let features: Vec<LayerFeature> = collection
            .features
            .into_iter()
            .map(LayerFeature::from_feature)
            .collect();
        self.features = features;
    }

    pub fn features(&self) -> &[LayerFeature] {
        &self.features
    }

    /// Topmost feature under the point. Later features are drawn over
    /// earlier ones, so search from the end.
    pub fn feature_at(&self, lon: f64, lat: f64) -> Option<&LayerFeature> {
        self.features
            .iter()
            .rev()
            .find(|feature| feature.contains(lon, lat))
    }
}

fn shape_of(geometry: &Geometry) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon { coordinates } => {
            polygon_of(coordinates).map(|polygon| MultiPolygon::new(vec![polygon]))
        }
        Geometry::MultiPolygon { coordinates } => {
            let polygons: Vec<Polygon<f64>> =
                coordinates.iter().filter_map(|rings| polygon_of(rings)).collect();
            if polygons.is_empty() {
                None
            } else {
                Some(MultiPolygon::new(polygons))
            }
        }
        Geometry::Unsupported => None,
    }
}

fn polygon_of(rings: &[Vec<Position>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    let exterior = ring_of(exterior);
    if exterior.0.len() < 3 {
        return None;
    }
    Some(Polygon::new(
        exterior,
        interiors.iter().map(|ring| ring_of(ring)).collect(),
    ))
}

fn ring_of(positions: &[Position]) -> LineString<f64> {
    positions
        .iter()
        .filter_map(|position| match position.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect::<Vec<_>>()
        .into()
}
