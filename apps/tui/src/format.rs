// Display helpers for the precinct popup and headless report

use crate::domain::Tier;

pub const MISSING: &str = "—";

/// `0.234` -> `23.4%`
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.1}%", v * 100.0))
}

/// Like `percent`, with an explicit `+` for non-negative values.
pub fn signed_percent(value: Option<f64>) -> String {
    value.map_or_else(
        || MISSING.to_string(),
        |v| {
            let sign = if v >= 0.0 { "+" } else { "" };
            format!("{sign}{:.1}%", v * 100.0)
        },
    )
}

/// Slider readout: whole percent, optionally signed.
pub fn whole_percent(value: f64, signed: bool) -> String {
    let sign = if signed && value >= 0.0 { "+" } else { "" };
    format!("{sign}{:.0}%", value * 100.0)
}

pub fn score(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.3}"))
}

/// Thousands-separated count.
pub fn count(value: Option<i64>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };

    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn district(cd_number: u32) -> String {
    format!("CA-{cd_number:02}")
}

pub fn optional_district(cd_number: Option<u32>) -> String {
    cd_number.map_or_else(|| MISSING.to_string(), district)
}

pub fn text(value: &str) -> &str {
    if value.is_empty() {
        MISSING
    } else {
        value
    }
}

pub fn tier_label(tier: Option<Tier>) -> &'static str {
    tier.map_or(MISSING, Tier::label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages() {
        assert_eq!(percent(Some(0.234)), "23.4%");
        assert_eq!(percent(Some(0.0)), "0.0%");
        assert_eq!(percent(None), MISSING);

        assert_eq!(signed_percent(Some(0.052)), "+5.2%");
        assert_eq!(signed_percent(Some(0.0)), "+0.0%");
        assert_eq!(signed_percent(Some(-0.125)), "-12.5%");
        assert_eq!(signed_percent(None), MISSING);

        assert_eq!(whole_percent(0.15, false), "15%");
        assert_eq!(whole_percent(0.0, true), "+0%");
        assert_eq!(whole_percent(-0.25, true), "-25%");
    }

    #[test]
    fn scores_use_three_decimals() {
        assert_eq!(score(Some(0.71234)), "0.712");
        assert_eq!(score(None), MISSING);
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(count(Some(0)), "0");
        assert_eq!(count(Some(999)), "999");
        assert_eq!(count(Some(1000)), "1,000");
        assert_eq!(count(Some(1_234_567)), "1,234,567");
        assert_eq!(count(Some(-45_000)), "-45,000");
        assert_eq!(count(None), MISSING);
    }

    #[test]
    fn districts_are_zero_padded() {
        assert_eq!(district(7), "CA-07");
        assert_eq!(district(52), "CA-52");
        assert_eq!(optional_district(None), MISSING);
    }

    #[test]
    fn unclassified_tier_has_placeholder() {
        assert_eq!(tier_label(Some(Tier::Watchlist)), "Watchlist");
        assert_eq!(tier_label(None), MISSING);
        assert_eq!(text(""), MISSING);
        assert_eq!(text("Fresno"), "Fresno");
    }
}
