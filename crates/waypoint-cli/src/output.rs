//! Output formatting for the CLI.

use crate::commands::analyze::Analysis;
use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use waypoint_domain::{AcceptedRecord, Source};

/// Longest title shown in tables before truncation.
const TITLE_WIDTH: usize = 48;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format accepted records.
    pub fn format_accepted(&self, records: &[AcceptedRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => Ok(self.format_accepted_table(records)),
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| r.fact_id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format accepted records as a table.
    fn format_accepted_table(&self, records: &[AcceptedRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No records accepted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Date", "Title", "Publisher", "Sources", "Categories", "Confidence"]);

        for record in records {
            let categories = record
                .categories
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            builder.push_record([
                record.date.format("%Y-%m-%d").to_string(),
                truncate(&record.title, TITLE_WIDTH),
                record.publisher.clone(),
                record.distinct_sources.to_string(),
                categories,
                self.confidence(record.confidence),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format configured sources.
    pub fn format_sources(&self, sources: &[&Source]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(sources)?),
            OutputFormat::Quiet => Ok(sources
                .iter()
                .map(|s| s.key().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if sources.is_empty() {
                    return Ok(self.colorize("No sources configured.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Category", "Priority", "Name", "URL"]);
                for source in sources {
                    builder.push_record([
                        source.category.to_string(),
                        source.priority.to_string(),
                        source.name.clone(),
                        source.base_url.clone(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format an analysis of a saved collection.
    pub fn format_analysis(&self, analysis: &Analysis) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(analysis)?),
            OutputFormat::Quiet => Ok(analysis.total.to_string()),
            OutputFormat::Table => {
                let mut lines = vec![
                    self.colorize(
                        &format!("Collection from {}", analysis.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
                        "cyan",
                    ),
                    format!("Total records: {}", analysis.total),
                    format!("Rejected facts: {}", analysis.rejected),
                ];
                if let Some(mean) = analysis.mean_confidence {
                    lines.push(format!("Mean confidence: {:.3}", mean));
                }
                if !analysis.by_category.is_empty() {
                    lines.push("Records by source category:".to_string());
                    for (category, count) in &analysis.by_category {
                        lines.push(format!("  {}: {}", category, count));
                    }
                }
                lines.push(String::new());
                lines.push("Sample data:".to_string());
                lines.push(self.format_accepted_table(&analysis.sample));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Confidence cell, green when high.
    fn confidence(&self, value: f64) -> String {
        let text = format!("{:.3}", value);
        if value >= 0.9 {
            self.colorize(&text, "green")
        } else {
            text
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten text to `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}
