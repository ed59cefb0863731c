/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Glucose band color (mg/dL):
/// \<70 → red (hypo)
/// \>180 → yellow (hyper)
/// otherwise → green
pub fn color_for_glucose(value: i64) -> &'static str {
    if value < 70 {
        RED
    } else if value > 180 {
        YELLOW
    } else {
        GREEN
    }
}

/// Ritorna formattazione colorata di un valore opzionale.
///
/// Esempio:
/// `colorize_optional("--")` → "<grey>--<reset>"
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glucose_bands() {
        assert_eq!(color_for_glucose(55), RED);
        assert_eq!(color_for_glucose(70), GREEN);
        assert_eq!(color_for_glucose(180), GREEN);
        assert_eq!(color_for_glucose(250), YELLOW);
    }

    #[test]
    fn empty_values_are_grey() {
        assert_eq!(colorize_optional(""), format!("{GREY}{RESET}"));
        assert_eq!(colorize_optional("12"), "12");
        assert_eq!(colorize_optional("--"), format!("{GREY}--{RESET}"));
    }
}
