//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Entities are shown by what they are (title, date, position) with the file
//! they came from as an indented `Source:` line, so the output reads as a
//! content inventory while still pointing back at specific files.
//!
//! # Output Format
//!
//! ## Build progress
//!
//! ```text
//! [01/10] Install plugin 'Syntax highlighting'
//! [04/10] Add Markdown files
//!     9 files (3ms)
//! ```
//!
//! ## Check
//!
//! ```text
//! Posts (2 items)
//! 001 Advent of Code 21 (Dec 26, 2021)
//!     Source: advent-of-code-21.md
//!     Tags: Swift
//! 002 Tube Status Widget (Jun 27, 2020)
//!     Source: tube-status-widget.md
//!
//! Pages
//! 001 About → about
//! ```
//!
//! ## Summary
//!
//! ```text
//! Generated 14 files in Output
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::context::PublishingContext;
use crate::pipeline::{BuildReport, StepEvent};
use crate::redirect::Redirect;
use crate::theme::components::display_date;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Build progress
// ============================================================================

pub fn format_step_event(event: &StepEvent) -> Vec<String> {
    match event {
        StepEvent::Started { index, total, name } => {
            let width = total.to_string().len().max(2);
            vec![format!("[{index:0>width$}/{total:0>width$}] {name}")]
        }
        StepEvent::Finished { files: 0, .. } => Vec::new(),
        StepEvent::Finished { files, elapsed, .. } => vec![format!(
            "{}{} ({}ms)",
            indent(1),
            plural(*files, "file"),
            elapsed.as_millis()
        )],
    }
}

pub fn format_build_summary(report: &BuildReport, output_dir: &Path) -> Vec<String> {
    vec![format!(
        "Generated {} in {}",
        plural(report.total_files(), "file"),
        output_dir.display()
    )]
}

pub fn print_build_summary(report: &BuildReport, output_dir: &Path) {
    for line in format_build_summary(report, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Inventory of everything ingested: sections with their items, then pages.
pub fn format_check_output(context: &PublishingContext) -> Vec<String> {
    let mut lines = Vec::new();

    for section in context.sections.iter() {
        lines.push(format!(
            "{} ({})",
            section.title,
            plural(section.items.len(), "item")
        ));
        for (i, item) in section.items_by_date().into_iter().enumerate() {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                item.title,
                display_date(item)
            ));
            lines.push(format!("{}Source: {}", indent(1), item.source_path));
            if !item.tags.is_empty() {
                let tags: Vec<&str> = item.tags.iter().map(|t| t.as_str()).collect();
                lines.push(format!("{}Tags: {}", indent(1), tags.join(", ")));
            }
        }
        lines.push(String::new());
    }

    if !context.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in context.pages.iter().enumerate() {
            lines.push(format!("{} {} → {}", format_index(i + 1), page.title, page.path));
        }
    }

    lines
}

pub fn print_check_output(context: &PublishingContext) {
    for line in format_check_output(context) {
        println!("{}", line);
    }
}

// ============================================================================
// Redirects
// ============================================================================

pub fn format_redirect(path: &str, redirect: &Redirect) -> Vec<String> {
    vec![path.to_string(), format!("{}{}", indent(1), redirect)]
}

pub fn print_redirect(path: &str, redirect: &Redirect) {
    for line in format_redirect(path, redirect) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::pipeline::StepReport;
    use crate::redirect;
    use crate::test_helpers::item_dated;
    use crate::types::{Page, SectionId, Tag};
    use std::time::Duration;

    #[test]
    fn started_event_is_zero_padded() {
        let lines = format_step_event(&StepEvent::Started {
            index: 4,
            total: 10,
            name: "Add Markdown files".into(),
        });
        assert_eq!(lines, vec!["[04/10] Add Markdown files"]);
    }

    #[test]
    fn finished_event_shows_files() {
        let lines = format_step_event(&StepEvent::Finished {
            index: 4,
            total: 10,
            name: "Add Markdown files".into(),
            files: 9,
            elapsed: Duration::from_millis(3),
        });
        assert_eq!(lines, vec!["    9 files (3ms)"]);
    }

    #[test]
    fn finished_without_files_is_silent() {
        let lines = format_step_event(&StepEvent::Finished {
            index: 1,
            total: 10,
            name: "Install plugin".into(),
            files: 0,
            elapsed: Duration::ZERO,
        });
        assert!(lines.is_empty());
    }

    #[test]
    fn summary_totals_files() {
        let report = BuildReport {
            steps: vec![
                StepReport { name: "a".into(), files: 1 },
                StepReport { name: "b".into(), files: 13 },
            ],
        };
        assert_eq!(
            format_build_summary(&report, Path::new("Output")),
            vec!["Generated 14 files in Output"]
        );
    }

    #[test]
    fn check_output_lists_items_newest_first() {
        let mut ctx = PublishingContext::new(SiteConfig::default(), "/tmp/unused");
        let mut old = item_dated("tube-status-widget", "2020-06-27");
        old.source_path = "tube-status-widget.md".into();
        let mut new = item_dated("advent-of-code-21", "2021-12-26");
        new.source_path = "advent-of-code-21.md".into();
        new.tags.insert(Tag("Swift".into()));
        let posts = ctx.sections.get_mut(SectionId::Posts);
        posts.items.push(old);
        posts.items.push(new);
        ctx.pages.push(Page {
            path: "about".into(),
            title: "About".into(),
            description: String::new(),
            content: String::new(),
        });

        let lines = format_check_output(&ctx);
        assert_eq!(lines[0], "Posts (2 items)");
        assert_eq!(lines[1], "001 advent-of-code-21 (Dec 26, 2021)");
        assert_eq!(lines[2], "    Source: advent-of-code-21.md");
        assert_eq!(lines[3], "    Tags: Swift");
        assert_eq!(lines[4], "002 tube-status-widget (Jun 27, 2020)");
        assert!(lines.contains(&"Things (0 items)".to_string()));
        assert_eq!(lines.last().unwrap(), "001 About → about");
    }

    #[test]
    fn redirect_lines() {
        let path = "/2020/06/27/create-a-tube-status-home-screen-widget-for-ios-14";
        let lines = format_redirect(path, &redirect::resolve(path));
        assert_eq!(lines[1], "    301 Moved Permanently → /posts/tube-status-widget");
    }
}
