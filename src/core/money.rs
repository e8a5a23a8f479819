//! Rounding and display helpers for emitted dollar amounts.

/// Rounds half-way values toward positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    // `value - floor` is exact, unlike `value + 0.5`, which can carry
    // 0.49999999999999994 up to 1.
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Percentage with one decimal place, using the same half-up rule.
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) as f64 / 10.0
}

/// Formats whole dollars with comma thousands separators ("1,234,567").
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
