//! Comparison report rendering
//!
//! Text output groups paths by category with a count in each heading; JSON
//! output carries the same data for pipelines. Paths within a category are
//! already sorted, so repeated runs on unchanged inputs render identically.

use crate::compare::{Category, ComparisonResult, ComparisonStats};
use crate::deep_diff::DeepDiffOutcome;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Color category headings in text output
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default)]
    pub format: ReportFormat,
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            color: default_true(),
            format: ReportFormat::default(),
        }
    }
}

/// Everything one run has to say
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub left: String,
    pub right: String,
    pub matched: bool,
    #[serde(flatten)]
    pub result: ComparisonResult,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub deep_diffs: BTreeMap<String, DeepDiffOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ComparisonStats>,
}

impl Report {
    pub fn new(left: String, right: String, result: ComparisonResult) -> Self {
        Self {
            left,
            right,
            matched: result.is_match(),
            result,
            deep_diffs: BTreeMap::new(),
            stats: None,
        }
    }
}

/// Render the report in the requested format
pub fn render(
    report: &Report,
    format: ReportFormat,
    color: bool,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(format_report_text(report, color)),
        ReportFormat::Json => format_report_json(report),
    }
}

/// Format the report as grouped text
pub fn format_report_text(report: &Report, color: bool) -> String {
    let mut out = String::new();

    for category in [
        Category::Identical,
        Category::Different,
        Category::OnlyInLeft,
        Category::OnlyInRight,
    ] {
        let paths = report.result.paths(category);
        let heading = format!("{} ({}):", category_title(report, category), paths.len());
        out.push_str(&style_heading(&heading, category, color));
        out.push('\n');

        for path in paths {
            out.push_str(&format!("  {}\n", path));
            if let Some(outcome) = report.deep_diffs.get(path) {
                out.push_str(&format_deep_diff(outcome));
            }
        }
    }

    if let Some(ref stats) = report.stats {
        out.push('\n');
        out.push_str(&format_stats_table(report, stats));
        out.push('\n');
    }

    out
}

/// Format the report as pretty JSON
pub fn format_report_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn category_title(report: &Report, category: Category) -> String {
    match category {
        Category::Identical => "Identical".to_string(),
        Category::Different => "Different".to_string(),
        Category::OnlyInLeft => format!("Only in {}", report.left),
        Category::OnlyInRight => format!("Only in {}", report.right),
    }
}

fn style_heading(heading: &str, category: Category, color: bool) -> String {
    if !color {
        return heading.to_string();
    }
    match category {
        Category::Identical => format!("{}", heading.green().bold()),
        Category::Different => format!("{}", heading.red().bold()),
        Category::OnlyInLeft | Category::OnlyInRight => format!("{}", heading.yellow().bold()),
    }
}

fn format_deep_diff(outcome: &DeepDiffOutcome) -> String {
    let mut out = String::new();
    match outcome {
        DeepDiffOutcome::Completed { exit_code, output } => {
            let status = exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            out.push_str(&format!("    deep-diff output (exit {}):\n", status));
            for line in output.lines() {
                out.push_str(&format!("      {}\n", line));
            }
        }
        DeepDiffOutcome::Unavailable { message } => {
            out.push_str(&format!("    warning: {}\n", message));
        }
    }
    out
}

/// Format summary statistics as a table
pub fn format_stats_table(report: &Report, stats: &ComparisonStats) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Statistic", "Count", "Share"]);

    let share = |count: usize| format!("{:.2}%", stats.percent(count));
    table.add_row(vec![
        "Total files compared".to_string(),
        stats.total.to_string(),
        String::new(),
    ]);
    for (label, count) in [
        ("Matches", stats.matches),
        ("Mismatches", stats.mismatches),
        ("Missing", stats.missing()),
    ] {
        table.add_row(vec![label.to_string(), count.to_string(), share(count)]);
    }
    table.add_row(vec![
        format!("Files from {} missing from {}", report.left, report.right),
        stats.missing_from_right.to_string(),
        String::new(),
    ]);
    table.add_row(vec![
        format!("Files from {} missing from {}", report.right, report.left),
        stats.missing_from_left.to_string(),
        String::new(),
    ]);
    table.add_row(vec![
        format!("Dirs from {} missing from {}", report.left, report.right),
        stats.dirs_missing_from_right.to_string(),
        String::new(),
    ]);
    table.add_row(vec![
        format!("Dirs from {} missing from {}", report.right, report.left),
        stats.dirs_missing_from_left.to_string(),
        String::new(),
    ]);

    format!("{}", table)
}
