use std::collections::HashMap;

/// Formats `value / total` as a percentage with two decimals, rounding
/// halves up (`1 / 32` is `"3.13"`).
///
/// Returns the literal `"0"` when `total` is zero.
pub fn calculate_percentage(value: usize, total: usize) -> String {
    if total == 0 {
        return "0".to_string();
    }
    let (value, total) = (value as u128, total as u128);
    let hundredths = (value * 20_000 + total) / (2 * total);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Counts one occurrence of `label`. Empty labels are not counted.
pub fn tally(counts: &mut HashMap<String, usize>, label: &str) {
    if label.is_empty() {
        return;
    }
    *counts.entry(label.to_string()).or_default() += 1;
}
