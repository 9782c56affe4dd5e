//! Readability delta shown in the popup tooltip.

/// Percentage decrease from `original` to `simplified`, rounded to one decimal.
///
/// Undefined unless both scores are finite and `original` is positive.
pub fn difficulty_drop(original: Option<f64>, simplified: Option<f64>) -> Option<f64> {
    let (original, simplified) = (original?, simplified?);
    if !original.is_finite() || !simplified.is_finite() || original <= 0.0 {
        return None;
    }

    let percent = (1.0 - simplified / original) * 100.0;
    Some((percent * 10.0).round() / 10.0)
}

pub fn format_difficulty_drop(drop: Option<f64>) -> String {
    match drop {
        Some(value) => format!("{value:.1}"),
        None => "N/A".to_string(),
    }
}

pub fn difficulty_tooltip(drop: Option<f64>) -> String {
    format!("Difficulty decreased by {}%", format_difficulty_drop(drop))
}
