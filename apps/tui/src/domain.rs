use serde::{Deserialize, Serialize};

/// Classification attached to a precinct by the upstream scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Priority,
    Target,
    Watchlist,
    Low,
}

impl Tier {
    pub const ALL: [Self; 4] = [Self::Priority, Self::Target, Self::Watchlist, Self::Low];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Target => "target",
            Self::Watchlist => "watchlist",
            Self::Low => "low",
        }
    }

    /// Exact match on the wire value. Anything else is unclassified.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "priority" => Some(Self::Priority),
            "target" => Some(Self::Target),
            "watchlist" => Some(Self::Watchlist),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::Target => "Target",
            Self::Watchlist => "Watchlist",
            Self::Low => "Low",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Priority => "Score ≥ 70%",
            Self::Target => "Score ≥ 50%",
            Self::Watchlist => "Score ≥ 30%",
            Self::Low => "Score < 30%",
        }
    }
}

/// One set of filter values. `district: None` means all districts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSnapshot {
    pub district: Option<u32>,
    pub youth_min: f64,
    pub margin_floor: f64,
}

impl FilterSnapshot {
    pub const DEFAULT_YOUTH_MIN: f64 = 0.15;
    pub const DEFAULT_MARGIN_FLOOR: f64 = 0.0;

    /// Like `==`, except a NaN threshold matches NaN. Used wherever "did
    /// anything change" must be reflexive.
    pub fn same_values(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }

        self.district == other.district
            && same(self.youth_min, other.youth_min)
            && same(self.margin_floor, other.margin_floor)
    }
}

impl Default for FilterSnapshot {
    fn default() -> Self {
        Self {
            district: None,
            youth_min: Self::DEFAULT_YOUTH_MIN,
            margin_floor: Self::DEFAULT_MARGIN_FLOOR,
        }
    }
}

/// Properties carried by every precinct feature in a `/api/precincts` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PrecinctProperties {
    pub precinct_id: String,
    #[serde(default)]
    pub county_name: String,
    #[serde(default)]
    pub cd_number: Option<u32>,
    #[serde(default)]
    pub total_pop: Option<i64>,
    #[serde(default)]
    pub pop_18_29: Option<i64>,
    #[serde(default)]
    pub youth_share: Option<f64>,
    #[serde(default)]
    pub dem_margin: Option<f64>,
    #[serde(default)]
    pub dem_pct: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub dem_votes: Option<i64>,
    #[serde(default)]
    pub rep_votes: Option<i64>,
    #[serde(default)]
    pub total_votes: Option<i64>,
}

impl PrecinctProperties {
    pub fn tier(&self) -> Option<Tier> {
        self.tier.as_deref().and_then(Tier::parse)
    }
}

/// GeoJSON position; a third (elevation) ordinate is ignored.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrecinctFeature {
    pub properties: PrecinctProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PrecinctCollection {
    #[serde(default)]
    pub features: Vec<PrecinctFeature>,
}

/// Per-district summary row from `/api/districts`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DistrictAggregate {
    pub cd_number: u32,
    pub precinct_count: u32,
    pub priority_count: u32,
    pub target_count: u32,
    #[serde(default)]
    pub avg_youth_share: Option<f64>,
    #[serde(default)]
    pub avg_dem_margin: Option<f64>,
}
