//! Money amount normalization shared by the parser and the sanitizer

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];
const CURRENCY_CODES: [&str; 3] = ["cad", "usd", "c"];

/// Multiplier for a magnitude suffix (`k`, `million`, ...)
pub fn unit_multiplier(unit: &str) -> Option<f64> {
    match unit.trim().to_ascii_lowercase().as_str() {
        "k" | "thousand" => Some(1_000.0),
        "m" | "mm" | "mil" | "million" => Some(1_000_000.0),
        "b" | "bn" | "billion" => Some(1_000_000_000.0),
        _ => None,
    }
}

/// Parse a digit run that may carry thousands separators (`1,250,000.50`)
pub fn parse_digits(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a user-supplied amount string into an absolute, non-negative number.
///
/// Strips currency symbols/codes, whitespace and thousands separators and
/// applies a magnitude suffix. Anything else fails closed with `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut s: String = raw
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c) && *c != ',' && *c != '_')
        .collect();

    for code in CURRENCY_CODES {
        if let Some(rest) = s.strip_prefix(code) {
            if rest.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
                s = rest.to_string();
            }
        }
    }
    for code in CURRENCY_CODES {
        if let Some(rest) = s.strip_suffix(code) {
            if rest.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '.') {
                s = rest.to_string();
                break;
            }
        }
    }
    let s = s.strip_suffix('+').unwrap_or(&s);

    let split = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    let value: f64 = number.parse().ok()?;
    let multiplier = if unit.is_empty() {
        1.0
    } else {
        unit_multiplier(unit)?
    };
    let value = value * multiplier;

    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}
