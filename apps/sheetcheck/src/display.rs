//! Output rendering and formatting

use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use sheetcheck_types::{
    BatchSummary, CheckResult, ColorChoice, DocumentStatus, EntityId, OutputFormat,
};
use std::io;

/// Cache state of one file's current content
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub document: String,
    pub entity: EntityId,
    pub fingerprint: String,
    pub processed: bool,
    pub version: Option<u32>,
    pub latest_version: Option<u32>,
}

/// Stored results for one entity
#[derive(Debug, Clone, Serialize)]
pub struct ResultsReport {
    pub entity: EntityId,
    pub version: Option<u32>,
    pub results: Vec<CheckResult>,
}

/// Version history and result store counters
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub entities: usize,
    pub documents: usize,
    pub versions: usize,
    pub stored_results: u64,
}

/// What a command produced
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Summary {
        summary: BatchSummary,
        dry_run: bool,
    },
    Status(StatusReport),
    Results(ResultsReport),
    Cache(CacheReport),
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    format: OutputFormat,
    color_choice: ColorChoice,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
        }
    }

    /// Render command output
    pub fn render_result(&self, output: &CommandOutput) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.render_json(output),
            OutputFormat::Tty | OutputFormat::Plain => self.render_table(output),
        }
    }

    #[allow(clippy::unused_self)]
    fn render_json(&self, output: &CommandOutput) -> io::Result<()> {
        let json = serde_json::to_string_pretty(output).map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn render_table(&self, output: &CommandOutput) -> io::Result<()> {
        match output {
            CommandOutput::Summary { summary, dry_run } => self.render_summary(summary, *dry_run),
            CommandOutput::Status(report) => self.render_status(report),
            CommandOutput::Results(report) => self.render_results(report),
            CommandOutput::Cache(report) => self.render_cache(report),
        }
        Ok(())
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        match self.format {
            OutputFormat::Plain => table.load_preset(ASCII_FULL),
            _ => table.load_preset(UTF8_FULL),
        };
        table.set_content_arrangement(ContentArrangement::Dynamic);
        match self.color_choice {
            ColorChoice::Always => {
                table.enforce_styling();
            }
            ColorChoice::Never => {
                table.force_no_tty();
            }
            ColorChoice::Auto => {}
        }
        table
    }

    fn header(names: &[&str]) -> Vec<Cell> {
        names
            .iter()
            .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
            .collect()
    }

    fn render_summary(&self, summary: &BatchSummary, dry_run: bool) {
        if summary.documents.is_empty() {
            println!("No documents found.");
            return;
        }

        let mut documents = self.table();
        documents.set_header(Self::header(&[
            "Document", "Entity", "Status", "Version", "Checks", "Note",
        ]));
        for outcome in &summary.documents {
            let status = match outcome.status {
                DocumentStatus::Processed if outcome.checks_failed() == 0 => {
                    Cell::new("processed").fg(Color::Green)
                }
                DocumentStatus::Processed => Cell::new("processed").fg(Color::Yellow),
                DocumentStatus::Skipped => Cell::new("skipped").fg(Color::DarkGrey),
                DocumentStatus::Failed => Cell::new("failed").fg(Color::Red),
            };
            let version = outcome
                .version
                .map_or_else(|| "-".to_string(), |v| v.to_string());
            let checks = if outcome.status == DocumentStatus::Processed {
                format!("{}/{}", outcome.checks_passed, outcome.checks_run)
            } else {
                "-".to_string()
            };
            documents.add_row(vec![
                Cell::new(&outcome.name),
                Cell::new(outcome.entity.as_str()),
                status,
                Cell::new(version),
                Cell::new(checks),
                Cell::new(outcome.reason.as_deref().unwrap_or("")),
            ]);
        }
        println!("{documents}");

        let mut totals = self.table();
        totals.set_header(Self::header(&["Metric", "Value"]));
        totals.add_row(vec!["Processed".to_string(), summary.processed.to_string()]);
        totals.add_row(vec!["Skipped".to_string(), summary.skipped.to_string()]);
        totals.add_row(vec!["Failed".to_string(), summary.failed.to_string()]);
        totals.add_row(vec!["Checks run".to_string(), summary.checks_run.to_string()]);
        totals.add_row(vec![
            "Checks passed".to_string(),
            summary.checks_passed.to_string(),
        ]);
        totals.add_row(vec![
            "Checks failed".to_string(),
            summary.checks_failed.to_string(),
        ]);
        totals.add_row(vec![
            "Pass rate".to_string(),
            format!("{:.1}%", summary.pass_rate() * 100.0),
        ]);
        totals.add_row(vec![
            "Entities".to_string(),
            summary.entities.len().to_string(),
        ]);
        totals.add_row(vec![
            "Duration".to_string(),
            format!("{} ms", summary.duration_ms),
        ]);
        println!("{totals}");

        if dry_run {
            println!("Dry run: results were not stored.");
        }
    }

    fn render_status(&self, report: &StatusReport) {
        let mut table = self.table();
        table.set_header(Self::header(&["Field", "Value"]));
        table.add_row(vec!["Document", report.document.as_str()]);
        table.add_row(vec!["Entity", report.entity.as_str()]);
        table.add_row(vec!["Fingerprint", report.fingerprint.as_str()]);
        table.add_row(vec![
            Cell::new("Processed"),
            if report.processed {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::Yellow)
            },
        ]);
        table.add_row(vec![
            "Version".to_string(),
            report
                .version
                .map_or_else(|| "-".to_string(), |v| v.to_string()),
        ]);
        table.add_row(vec![
            "Latest version".to_string(),
            report
                .latest_version
                .map_or_else(|| "-".to_string(), |v| v.to_string()),
        ]);
        println!("{table}");
    }

    fn render_results(&self, report: &ResultsReport) {
        if report.results.is_empty() {
            match report.version {
                Some(version) => println!(
                    "No results stored for entity {} version {version}.",
                    report.entity
                ),
                None => println!("No results stored for entity {}.", report.entity),
            }
            return;
        }

        let mut table = self.table();
        table.set_header(Self::header(&[
            "Document",
            "Version",
            "Check",
            "Result",
            "Value",
            "Description",
            "Processed at",
        ]));
        for result in &report.results {
            let verdict = if result.passed {
                Cell::new("pass").fg(Color::Green)
            } else {
                Cell::new("FAIL").fg(Color::Red)
            };
            table.add_row(vec![
                Cell::new(&result.document),
                Cell::new(result.version),
                Cell::new(&result.check),
                verdict,
                Cell::new(result.value.map_or_else(|| "-".to_string(), |v| v.to_string())),
                Cell::new(&result.description),
                Cell::new(result.processed_at.format("%Y-%m-%d %H:%M:%S")),
            ]);
        }
        println!("{table}");
    }

    fn render_cache(&self, report: &CacheReport) {
        let mut table = self.table();
        table.set_header(Self::header(&["Metric", "Value"]));
        table.add_row(vec!["Entities".to_string(), report.entities.to_string()]);
        table.add_row(vec!["Documents".to_string(), report.documents.to_string()]);
        table.add_row(vec!["Versions".to_string(), report.versions.to_string()]);
        table.add_row(vec![
            "Stored results".to_string(),
            report.stored_results.to_string(),
        ]);
        println!("{table}");
    }
}
