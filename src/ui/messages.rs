//! User-facing console messages (icons + colours).
//!
//! Diagnostics for developers go through `tracing`; these are for people.

use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

#[derive(Clone, Copy)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Level::Info => (FG_BLUE, "ℹ️"),
            Level::Success => (FG_GREEN, "✅"),
            Level::Warning => (FG_YELLOW, "⚠️"),
            Level::Error => (FG_RED, "❌"),
        }
    }
}

fn format_line(level: Level, msg: &dyn fmt::Display) -> String {
    let (color, icon) = level.style();
    format!("{}{}{} {}{}", color, BOLD, icon, RESET, msg)
}

fn emit(level: Level, msg: &dyn fmt::Display) {
    let line = format_line(level, msg);
    match level {
        Level::Info | Level::Success => println!("{}", line),
        // stdout resta pulito per list/show
        Level::Warning | Level::Error => eprintln!("{}", line),
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    emit(Level::Info, &msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    emit(Level::Success, &msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    emit(Level::Warning, &msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    emit(Level::Error, &msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}{}====================== {}\n{}",
        FG_BLUE, BOLD, msg, RESET
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_icon_and_reset() {
        let line = format_line(Level::Warning, &"careful");
        assert!(line.starts_with(FG_YELLOW));
        assert!(line.contains("⚠️"));
        assert!(line.ends_with("careful"));
    }
}
