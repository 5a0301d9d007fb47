/// Shared utility functions for the RIP analysis pipeline
///
/// Remove accent marks from a string
///
/// The string is decomposed (Unicode NFD) and every combining mark is dropped,
/// so "Março" becomes "Marco" and "janéiro" becomes "janeiro".
///
/// # Examples
///
/// ```
/// use rip_analysis::utils::strip_accents;
///
/// assert_eq!(strip_accents("Março"), "Marco");
/// assert_eq!(strip_accents("Híbrido"), "Hibrido");
/// assert_eq!(strip_accents("Zebu"), "Zebu");
/// ```
pub fn strip_accents(value: &str) -> String {
    use unicode_normalization::char::is_combining_mark;
    use unicode_normalization::UnicodeNormalization;

    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Round a value to two decimal places
///
/// Rounds the exact binary value, so ties go to the even digit (0.125 -> 0.12)
/// and huge magnitudes stay finite.
///
/// # Examples
///
/// ```
/// use rip_analysis::utils::round2;
///
/// assert_eq!(round2(10.456), 10.46);
/// assert_eq!(round2(20.111), 20.11);
/// assert_eq!(round2(0.125), 0.12);
/// ```
pub fn round2(value: f64) -> f64 {
    let rounded = format!("{value:.2}").parse().unwrap_or(value);
    // -0.0 would render as "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format an optional value with exactly two decimals, blank for null
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", round2(v)),
        None => String::new(),
    }
}

/// Escape text for safe inclusion in HTML element content and attribute values
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
