#![allow(dead_code)]

use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Duration Formatting
// ============================================================================

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Parse a human-readable duration string (e.g., "45s", "10m", "1h30m")
///
/// Supports the units ms, s, m, h, combined in any order.
/// Returns total milliseconds as u64
pub fn parse_duration(input: &str) -> Result<u64, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Empty duration string".to_string());
    }

    let mut total_ms: u64 = 0;
    let mut rest = input;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(format!("Expected a number in duration: '{}'", input));
        }

        let (digits, tail) = rest.split_at(digits_end);
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("Invalid number in duration: '{}'", digits))?;

        // "ms" must be tried before "m"
        let (unit_ms, tail) = if let Some(t) = tail.strip_prefix("ms") {
            (1, t)
        } else if let Some(t) = tail.strip_prefix('s') {
            (MS_PER_SECOND, t)
        } else if let Some(t) = tail.strip_prefix('m') {
            (MS_PER_MINUTE, t)
        } else if let Some(t) = tail.strip_prefix('h') {
            (MS_PER_HOUR, t)
        } else {
            return Err(format!("Missing or unknown unit in duration: '{}'", input));
        };

        total_ms = total_ms.saturating_add(value.saturating_mul(unit_ms));
        rest = tail;
    }

    Ok(total_ms)
}

/// Format milliseconds as a human-readable duration, truncated to seconds
///
/// Follows the "1h30m0s" notation: hours drop when zero, minutes drop only
/// when hours are zero too.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / MS_PER_SECOND;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
