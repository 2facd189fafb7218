use crate::cli::OutputFormat;
use crate::models::{ScanReport, TodoOccurrence, TodoSummary};
use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::fs;
use std::path::Path;

/// Generate and output a scan report in the specified format
pub fn generate_report(
    report: &ScanReport,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    let output = match format {
        OutputFormat::Terminal => format_terminal(report),
        OutputFormat::Json => format_json(report)?,
    };

    if let Some(path) = output_path {
        fs::write(path, output)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        println!("Report written to {}", path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// One occurrence as `path:line [marker] content`
pub fn format_occurrence(todo: &TodoOccurrence) -> String {
    format!(
        "{}:{} [{}] {}",
        todo.file_path.display(),
        todo.line_number,
        todo.raw_marker,
        todo.content
    )
}

/// Headline counts shared by the scan and track commands
pub fn format_summary(summary: &TodoSummary) -> String {
    let types = summary
        .todo_types
        .iter()
        .map(|(marker, count)| format!("{}: {}", marker, count))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Total TODOs: {}\nFiles with TODOs: {}\nTODO types: {{{}}}",
        summary.total_todos, summary.files_with_todos, types
    )
}

fn format_terminal(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Scan Results for: {}\n", report.scan_path.display()));
    output.push_str(&format!("{}\n", "=".repeat(50)));
    output.push_str(&format_summary(&report.summary));
    output.push_str("\n\n");

    if !report.summary.files.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("File").fg(Color::Cyan),
                Cell::new("TODOs").fg(Color::Cyan),
            ]);

        let mut files: Vec<_> = report.summary.files.iter().collect();
        files.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (path, count) in files {
            table.add_row(vec![path.display().to_string(), count.to_string()]);
        }

        output.push_str(&format!("{}\n\n", table));
    }

    output.push_str("TODOs found:\n");
    for todo in &report.todos {
        output.push_str(&format!("  {}\n", format_occurrence(todo)));
    }

    output
}

fn format_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
}
