//! Validation report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::utils::plural_s;

/// A single validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The source or anchor that failed.
    pub target: String,
    /// Error reason/message.
    pub reason: String,
}

/// Validation findings, grouped by where they were found.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Slots that ended hidden or never loaded, grouped by section.
    pub slots: BTreeMap<String, Vec<ValidationError>>,
    /// Sidebar anchors without a target, grouped by page file.
    pub links: BTreeMap<String, Vec<ValidationError>>,
}

impl ValidationReport {
    pub fn add_slot(&mut self, group: String, source: String, reason: String) {
        self.slots.entry(group).or_default().push(ValidationError {
            target: source,
            reason,
        });
    }

    pub fn add_link(&mut self, group: String, href: String, reason: String) {
        self.links.entry(group).or_default().push(ValidationError {
            target: href,
            reason,
        });
    }

    pub fn slot_error_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn link_error_count(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.links.is_empty()
    }

    /// Print the full report to stderr (slots -> links).
    pub fn print(&self) {
        Self::print_section("slots", &self.slots);
        Self::print_section("links", &self.links);
    }

    fn print_section(name: &str, errors: &BTreeMap<String, Vec<ValidationError>>) {
        if errors.is_empty() {
            return;
        }
        eprintln!();

        let error_count: usize = errors.values().map(Vec::len).sum();
        eprintln!(
            "{} {}",
            name.red().bold(),
            format!("({error_count} error{})", plural_s(error_count)).dimmed()
        );

        for (group, errs) in errors {
            eprintln!("{}{}{}", "[".dimmed(), group.cyan(), "]".dimmed());
            for e in errs {
                if e.reason.is_empty() {
                    eprintln!("{} {}", "→".red(), e.target);
                } else {
                    eprintln!("{} {} {}", "→".red(), e.target, e.reason.dimmed());
                }
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.slot_error_count() + self.link_error_count();

        if total == 0 {
            write!(f, "{}", "all checks passed".green())
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                total.to_string().red().bold(),
                format!("error{}", plural_s(total)).dimmed()
            )
        }
    }
}
