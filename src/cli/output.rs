//! Terminal output for interactive commands
//!
//! The report itself goes through [`crate::document::Document`]; this is only
//! for the short human-facing summaries printed by `validate` and `version`.

use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print a message only in verbose mode
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<14} {}", style(key).dim(), value);
        }
    }

    /// Print an outline entry indented by depth
    pub fn tree_item(&self, depth: usize, item: &str, enabled: bool) {
        if self.quiet {
            return;
        }
        let indent = "  ".repeat(depth + 1);
        if enabled {
            println!("{indent}{} {}", style("•").cyan(), item);
        } else {
            println!("{indent}{} {}", style("◦").dim(), style(item).dim());
        }
    }
}
