//! Formatting utilities used for CLI and export outputs.

use std::fmt::Display;

/// Render an optional value, `--` when missing.
pub fn opt<T: Display>(v: &Option<T>) -> String {
    match v {
        Some(x) => x.to_string(),
        None => "--".to_string(),
    }
}

/// Render an optional float without trailing zeros (`4.0` → `4`).
pub fn opt_f64(v: Option<f64>) -> String {
    match v {
        Some(x) if x.fract() == 0.0 => format!("{:.0}", x),
        Some(x) => format!("{}", x),
        None => "--".to_string(),
    }
}

/// Shorten free text to `max` characters, marking the cut with `…`.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_rendering() {
        assert_eq!(opt(&Some(5)), "5");
        assert_eq!(opt::<i64>(&None), "--");
        assert_eq!(opt_f64(Some(4.0)), "4");
        assert_eq!(opt_f64(Some(2.5)), "2.5");
    }

    #[test]
    fn long_notes_are_cut() {
        assert_eq!(ellipsize("Frühstück mit Müsli", 6), "Frühs…");
        assert_eq!(ellipsize("kurz", 6), "kurz");
    }
}
