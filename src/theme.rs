//! Terminal styling helpers.

use colored::Colorize;

pub struct Theme;

impl Theme {
    pub fn success(text: &str) -> String {
        text.green().to_string()
    }

    pub fn warning(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn error(text: &str) -> String {
        text.red().to_string()
    }

    pub fn muted(text: &str) -> String {
        text.dimmed().to_string()
    }

    pub fn header(text: &str) -> String {
        text.bold().to_string()
    }

    pub fn command(text: &str) -> String {
        text.cyan().to_string()
    }
}
