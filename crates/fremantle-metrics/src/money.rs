//! Currency formatting for notes and warnings.

/// Format a USD amount rounded to whole dollars with thousands separators.
///
/// ```
/// use fremantle_metrics::money::format_usd;
///
/// assert_eq!(format_usd(1_234_567.6), "$1,234,568");
/// assert_eq!(format_usd(-950.0), "-$950");
/// ```
pub fn format_usd(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
