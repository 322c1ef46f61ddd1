//! Terminal output: status lines and the run summary.
//!
//! Everything here writes to stderr so stdout stays free for piping.

use std::sync::atomic::{AtomicBool, Ordering};

mod format;
mod messages;

pub use format::{format_duration, print_summary, summary_lines};
pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether status output is colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && crate::logger::should_use_colors(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Apply `style` when colors are enabled.
pub(crate) fn paint(text: &str, style: owo_colors::Style) -> String {
    use owo_colors::OwoColorize;

    if colors_enabled() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}
