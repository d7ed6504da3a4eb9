//! Completeness badge normalization.

/// Normalizes a completeness value into a whole percentage.
///
/// Values in [0,1] are treated as fractions and scaled by 100; other
/// numbers are taken as whole percentages. The result is clamped to
/// [0,100]. Non-finite input renders as 0%.
pub fn completeness_percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    let percent = if (0.0..=1.0).contains(&value) {
        value * 100.0
    } else {
        value
    };
    percent.clamp(0.0, 100.0).round() as u8
}

/// Normalizes an arbitrary JSON value; anything non-numeric is 0%.
pub fn completeness_percent_from_json(value: &serde_json::Value) -> u8 {
    value.as_f64().map(completeness_percent).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fraction_scales_to_percent() {
        assert_eq!(completeness_percent(0.5), 50);
        assert_eq!(completeness_percent(0.0), 0);
        assert_eq!(completeness_percent(1.0), 100);
        assert_eq!(completeness_percent(0.333), 33);
    }

    #[test]
    fn test_whole_percentages_pass_through() {
        assert_eq!(completeness_percent(50.0), 50);
        assert_eq!(completeness_percent(87.4), 87);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(completeness_percent(150.0), 100);
        assert_eq!(completeness_percent(-3.0), 0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(completeness_percent(f64::NAN), 0);
        assert_eq!(completeness_percent(f64::INFINITY), 0);
    }

    #[test]
    fn test_json_non_numeric_is_zero() {
        assert_eq!(completeness_percent_from_json(&json!("eighty")), 0);
        assert_eq!(completeness_percent_from_json(&json!(null)), 0);
        assert_eq!(completeness_percent_from_json(&json!(0.8)), 80);
        assert_eq!(completeness_percent_from_json(&json!(42)), 42);
    }
}
