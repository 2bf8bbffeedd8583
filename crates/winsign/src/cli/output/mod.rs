//! Output formatting utilities

use console::{style, Style};

use winsign_signing::BackendTag;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Style for a backend tag
pub fn backend_style(backend: BackendTag) -> Style {
    match backend {
        BackendTag::Binary => Style::new().green(),
        BackendTag::Package => Style::new().magenta(),
        BackendTag::Unsigned => Style::new().dim(),
    }
}
