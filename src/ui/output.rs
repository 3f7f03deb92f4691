//! Status lines on standard error. Standard output is reserved for the
//! import summary and query results.

use crate::ui::theme;
use owo_colors::OwoColorize;

pub fn error(label: &str) {
    eprintln!("{}", label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{}", label.style(theme().warn.clone()));
}
