use owo_colors::OwoColorize;
use readmode_core::{Location, LocatorConfig, ReaderSettings};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "readmode".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Read web pages without the clutter\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print a labelled detail line
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print how the content container was found
pub fn print_location(location: Location, config: &LocatorConfig) {
    match location {
        Location::Pattern(index) => {
            let pattern = config.patterns.get(index).map(|p| p.to_string()).unwrap_or_default();
            print_detail("Matched", &format!("pattern {}", pattern));
        }
        Location::Density { length } => {
            print_detail("Matched", &format!("largest <{}> ({} chars)", config.density_tag, length));
        }
    }
}

/// Print the effective reader settings
pub fn print_settings(settings: &ReaderSettings) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Reader Settings".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    let font = format!("{}px {} ({})", settings.font_size, settings.font_family, settings.font_weight.as_css());
    print_detail("Font", &font);
    print_detail("Line height", &settings.line_height.to_string());
    print_detail("Width", &format!("{}px", settings.width));
    print_detail("Theme", &format!("{:?}", settings.theme).to_lowercase());
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
