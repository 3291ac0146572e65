use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::ResultsCollector;
use crate::models::{LicenseData, LicenseRisk, Status};

/// Primary collector: colored summary plus tables of what needs attention.
pub struct ConsoleCollector {
    results: Vec<LicenseData>,
    verbose: bool,
    quiet: bool,
}

impl ConsoleCollector {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        ConsoleCollector {
            results: Vec::new(),
            verbose,
            quiet,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let deps = &self.results;
        let total = deps.len();
        let approved = count(deps, Status::Approved);
        let restricted = count(deps, Status::Restricted);
        let review = count(deps, Status::NeedsReview);

        if self.quiet {
            let _ = writeln!(
                out,
                "Total: {}  Approved: {}  Restricted: {}  Review: {}",
                total,
                approved.to_string().green(),
                restricted.to_string().red(),
                review.to_string().yellow(),
            );
            return out;
        }

        let _ = writeln!(out, "\n {} v{}\n", "clearance-checkr".bold(), env!("CARGO_PKG_VERSION"));

        // Summary box
        let _ = writeln!(out, " ┌────────────────────────────────────────────────────┐");
        let _ = writeln!(out, " │  {:<48} │", "SUMMARY".bold());
        let _ = writeln!(out, " │  {:<48} │", format!("Total dependencies : {}", total));
        let _ = writeln!(
            out,
            " │  {:<48} │",
            format!(
                "{}  Approved        : {:>4}  {}",
                "✓".green(),
                approved,
                summarize_licenses(deps, Status::Approved)
            )
        );
        let _ = writeln!(
            out,
            " │  {:<48} │",
            format!(
                "{}  Restricted      : {:>4}  {}",
                "✗".red(),
                restricted,
                summarize_licenses(deps, Status::Restricted)
            )
        );
        let _ = writeln!(
            out,
            " │  {:<48} │",
            format!(
                "{}  Needs review    : {:>4}  {}",
                "⚠".yellow(),
                review,
                summarize_licenses(deps, Status::NeedsReview)
            )
        );
        let _ = writeln!(out, " └────────────────────────────────────────────────────┘\n");

        if restricted > 0 {
            let _ = writeln!(out, " {} Restricted dependencies:\n", "[RESTRICTED]".red().bold());
            let _ = writeln!(out, "{}\n", table(deps, Status::Restricted));
        }

        if review > 0 {
            let _ = writeln!(out, " {} Dependencies needing review:\n", "[REVIEW]".yellow().bold());
            let _ = writeln!(out, "{}\n", table(deps, Status::NeedsReview));
        }

        if self.verbose && approved > 0 {
            let _ = writeln!(out, " {} Approved dependencies:\n", "[APPROVED]".green().bold());
            let _ = writeln!(out, "{}\n", table(deps, Status::Approved));
        }

        out
    }
}

impl ResultsCollector for ConsoleCollector {
    fn accept(&mut self, data: &LicenseData) {
        self.results.push(data.clone());
    }

    fn close(&mut self) -> Result<()> {
        print!("{}", self.render());
        Ok(())
    }
}

fn count(deps: &[LicenseData], status: Status) -> usize {
    deps.iter().filter(|d| d.status == status).count()
}

fn table(deps: &[LicenseData], status: Status) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Id").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for dep in deps.iter().filter(|d| d.status == status) {
        let (status_str, status_color) = match dep.status {
            Status::Approved => ("✓ approved", Color::Green),
            Status::Restricted => ("✗ restricted", Color::Red),
            Status::NeedsReview => ("⚠ review", Color::Yellow),
        };

        let risk_color = match dep.risk {
            LicenseRisk::Permissive => Color::Green,
            LicenseRisk::WeakCopyleft => Color::Yellow,
            LicenseRisk::StrongCopyleft => Color::Red,
            LicenseRisk::Proprietary => Color::Magenta,
            LicenseRisk::Unknown => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(dep.id.to_string()),
            Cell::new(dep.license.as_deref().unwrap_or("unknown")),
            Cell::new(dep.risk.to_string()).fg(risk_color),
            Cell::new(dep.provenance.to_string()),
            Cell::new(status_str)
                .fg(status_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    table
}

fn summarize_licenses(deps: &[LicenseData], status: Status) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for dep in deps.iter().filter(|d| d.status == status) {
        *counts.entry(dep.license.as_deref().unwrap_or("unknown")).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::tests::sample;

    fn collect(verbose: bool, quiet: bool) -> String {
        colored::control::set_override(false);
        let mut collector = ConsoleCollector::new(verbose, quiet);
        for data in sample() {
            collector.accept(&data);
        }
        collector.render()
    }

    #[test]
    fn test_quiet_summary_line() {
        let out = collect(false, true);
        assert_eq!(out, "Total: 3  Approved: 1  Restricted: 1  Review: 1\n");
    }

    #[test]
    fn test_attention_tables() {
        let out = collect(false, false);
        assert!(out.contains("[RESTRICTED]"));
        assert!(out.contains("[REVIEW]"));
        assert!(out.contains("evil"));
        assert!(!out.contains("[APPROVED]"));
    }

    #[test]
    fn test_verbose_lists_approved() {
        let out = collect(true, false);
        assert!(out.contains("[APPROVED]"));
        assert!(out.contains("CQ1234"));
    }

    #[test]
    fn test_license_summary_top_three() {
        let summary = summarize_licenses(&sample(), Status::Restricted);
        assert_eq!(summary, "[GPL-3.0 (1)]");
        assert_eq!(summarize_licenses(&[], Status::Approved), "");
    }
}
