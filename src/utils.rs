//! Shared utility functions used across modules.

/// Truncate a string to `max_chars` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars > 3 {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head.trim_end())
    } else {
        s.chars().take(max_chars).collect()
    }
}

/// Escape text for an HTML text node or a double-quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trimmed, non-empty view of an optional string.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Format an amount in minor units for display, e.g. `2400, "USD"` ⇒ `$24.00`.
pub fn format_price(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let amount = format!("{}.{:02}", abs / 100, abs % 100);
    match currency.to_ascii_uppercase().as_str() {
        "USD" => format!("{}${}", sign, amount),
        "EUR" => format!("{}€{}", sign, amount),
        "GBP" => format!("{}£{}", sign, amount),
        other => format!("{}{} {}", sign, amount, other),
    }
}

/// Five-star rating strip, e.g. `4` ⇒ `★★★★☆`. Ratings above five are capped.
pub fn rating_stars(rating: u8, max: u8) -> String {
    let filled = rating.min(max) as usize;
    let empty = max as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}
