//! Canonical query string for an applied filter snapshot.
//!
//! The same string is sent to `/api/precincts` and `/api/export/csv`.
//! `district` is left out entirely to mean "all districts".

use crate::domain::FilterSnapshot;
use url::form_urlencoded;

const YOUTH_MIN: &str = "youth_min";
const MARGIN_FLOOR: &str = "margin_floor";
const DISTRICT: &str = "district";

pub fn encode(snapshot: &FilterSnapshot) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair(YOUTH_MIN, &format_float(snapshot.youth_min));
    serializer.append_pair(MARGIN_FLOOR, &format_float(snapshot.margin_floor));
    if let Some(district) = snapshot.district {
        serializer.append_pair(DISTRICT, &district.to_string());
    }
    serializer.finish()
}

/// Parse a query over the default snapshot. Unknown keys are ignored and
/// values that fail to parse or are not finite keep their default.
pub fn decode(query: &str) -> FilterSnapshot {
    let mut snapshot = FilterSnapshot::default();
    let query = query.trim_start_matches('?');

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            YOUTH_MIN => {
                if let Some(parsed) = finite(&value) {
                    snapshot.youth_min = parsed;
                }
            }
            MARGIN_FLOOR => {
                if let Some(parsed) = finite(&value) {
                    snapshot.margin_floor = parsed;
                }
            }
            DISTRICT => {
                if let Ok(parsed) = value.parse() {
                    snapshot.district = Some(parsed);
                }
            }
            _ => {}
        }
    }

    snapshot
}

// `NaN` and `inf` parse as f64 but are not thresholds
fn finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

// Shortest round-trip representation; -0 and 0 compare equal so they must
// encode the same.
fn format_float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_omits_district() {
        let snapshot = FilterSnapshot {
            district: None,
            youth_min: 0.15,
            margin_floor: 0.0,
        };
        assert_eq!(encode(&snapshot), "youth_min=0.15&margin_floor=0");
    }

    #[test]
    fn district_is_appended_when_selected() {
        let snapshot = FilterSnapshot {
            district: Some(12),
            youth_min: 0.15,
            margin_floor: 0.0,
        };
        assert_eq!(encode(&snapshot), "youth_min=0.15&margin_floor=0&district=12");
    }

    #[test]
    fn floats_are_not_rounded() {
        let snapshot = FilterSnapshot {
            district: None,
            youth_min: 0.123_456_789,
            margin_floor: -0.07,
        };
        assert_eq!(
            encode(&snapshot),
            "youth_min=0.123456789&margin_floor=-0.07"
        );
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let snapshot = FilterSnapshot {
            district: Some(99),
            youth_min: 0.9,
            margin_floor: -2.5,
        };
        assert_eq!(encode(&snapshot), "youth_min=0.9&margin_floor=-2.5&district=99");
    }

    #[test]
    fn equal_snapshots_encode_identically() {
        let positive = FilterSnapshot {
            district: None,
            youth_min: 0.2,
            margin_floor: 0.0,
        };
        let negative_zero = FilterSnapshot {
            margin_floor: -0.0,
            ..positive
        };
        assert_eq!(positive, negative_zero);
        assert_eq!(encode(&positive), encode(&negative_zero));
    }

    #[test]
    fn decode_reads_encoded_form() {
        let snapshot = decode("?youth_min=0.3&margin_floor=-0.1&district=7");
        assert_eq!(
            snapshot,
            FilterSnapshot {
                district: Some(7),
                youth_min: 0.3,
                margin_floor: -0.1,
            }
        );
    }

    #[test]
    fn decode_ignores_non_finite_thresholds() {
        let snapshot = decode("youth_min=NaN&margin_floor=inf&district=4");
        assert_eq!(
            snapshot,
            FilterSnapshot {
                district: Some(4),
                ..FilterSnapshot::default()
            }
        );
        assert_eq!(decode("margin_floor=-inf"), FilterSnapshot::default());
    }

    #[test]
    fn decode_falls_back_to_defaults() {
        assert_eq!(decode(""), FilterSnapshot::default());

        let snapshot = decode("youth_min=abc&district=&tier=priority");
        assert_eq!(snapshot, FilterSnapshot::default());
    }
}
