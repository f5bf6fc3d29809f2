//! HbA1c value detection in free-form report text.
//!
//! Grammar (case-insensitive):
//! `hba1c | hb<ws>a1c | a1c`, optional `level | value | reading`,
//! optional `:` or `=`, then `NN[.NN]`. Whitespace between parts is optional.
//!
//! Only the first plausible value (0 < v < 25) counts. Later mentions,
//! e.g. a value restated in a footer, are ignored.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::is_plausible_hba1c;

/// ASCII digit classes on purpose: `\d` would also admit non-ASCII digits.
static HBA1C_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:hba1c|hb\s*a1c|a1c)\s*(?:level|value|reading)?\s*[:=]?\s*([0-9]{1,2}(?:\.[0-9]{1,2})?)",
    )
    .unwrap()
});

fn plausible_matches(text: &str) -> impl Iterator<Item = f64> + '_ {
    HBA1C_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| is_plausible_hba1c(*v))
}

/// First plausible HbA1c percentage in `text`, or `None` if none is found.
pub fn extract_hba1c_value(text: &str) -> Option<f64> {
    plausible_matches(text).next()
}
