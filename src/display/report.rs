//! Report formatting utilities for terminal output

use crate::models::Money;
use crate::reports::Aggregation;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar scaled against `max_value`
pub fn format_bar(value: Money, max_value: Money, width: usize) -> String {
    if !max_value.is_positive() || !value.is_positive() {
        return " ".repeat(width);
    }

    let ratio = value.cents() as f64 / max_value.cents() as f64;
    let filled = ((ratio * width as f64).round() as usize).min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bar chart of category totals, largest first
pub fn format_category_chart(aggregation: &Aggregation, currency: &str) -> String {
    let categories = aggregation.categories_by_total();
    let Some(largest) = categories.first().map(|c| c.total) else {
        return String::new();
    };

    let mut output = String::new();
    for entry in &categories {
        output.push_str(&format!(
            "{:<20} {} {:>12} {:>6}\n",
            truncate(entry.category.label(), 20),
            format_bar(entry.total, largest, 24),
            entry.total.format_with_symbol(currency),
            format_percentage(aggregation.category_share(entry))
        ));
    }
    output
}

/// Truncate to `max_len` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
