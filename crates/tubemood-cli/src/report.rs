//! Report rendering: markdown table plus a text sentiment chart, JSON, or an
//! xlsx workbook with a native pie chart.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rust_xlsxwriter::{Chart, ChartDataLabel, ChartType, Format, Workbook, Worksheet};
use serde::Serialize;
use tubemood_sentiment::{ClassifiedRow, PipelineOutput, Tally};

const BAR_WIDTH: usize = 40;

const DEFAULT_REPORT_STEM: &str = "youtube_comments";

pub(crate) const COMMENTS_SHEET: &str = "Comments";
pub(crate) const TALLY_SHEET: &str = "Tally";

/// Pie chart anchor on the comments sheet: cell `E1`.
const CHART_ROW: u32 = 0;
const CHART_COL: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    Markdown,
    Json,
    Xlsx,
}

impl ReportFormat {
    pub(crate) fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }

    /// `youtube_comments.<ext>` in the working directory.
    pub(crate) fn default_output(self) -> PathBuf {
        PathBuf::from(format!("{DEFAULT_REPORT_STEM}.{}", self.extension()))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    content_id: &'a str,
    generated_at: DateTime<Utc>,
    rows: &'a [ClassifiedRow],
    tally: Tally,
    degraded: usize,
}

/// Renders the whole report in memory so a failure leaves no partial file.
pub(crate) fn render(
    format: ReportFormat,
    output: &PipelineOutput,
    generated_at: DateTime<Utc>,
) -> anyhow::Result<Vec<u8>> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(output, generated_at).into_bytes()),
        ReportFormat::Json => {
            let report = JsonReport {
                content_id: &output.content_id,
                generated_at,
                rows: &output.rows,
                tally: output.tally,
                degraded: output.degraded,
            };
            serde_json::to_vec_pretty(&report).context("failed to serialize JSON report")
        }
        ReportFormat::Xlsx => render_xlsx(output),
    }
}

pub(crate) fn render_markdown(output: &PipelineOutput, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Comment Sentiment Report");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Generated**: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "**Video**: {}", output.content_id);
    let _ = writeln!(out, "**Comments**: {}", output.rows.len());
    if output.degraded > 0 {
        let _ = writeln!(
            out,
            "**Unclassified (recorded as Neutral)**: {}",
            output.degraded
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    let _ = writeln!(out, "| No. | Comment | Sentiment |");
    let _ = writeln!(out, "|-----|---------|-----------|");
    for row in &output.rows {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            row.index,
            escape_cell(&row.text),
            row.label
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## Sentiment distribution");
    let _ = writeln!(out);
    let _ = writeln!(out, "```text");
    out.push_str(&render_chart(&output.tally));
    let _ = writeln!(out, "```");

    out
}

/// One bar per label, scaled to the share of all comments.
pub(crate) fn render_chart(tally: &Tally) -> String {
    let total = tally.total();
    let mut out = String::new();

    for (label, count) in tally.iter() {
        #[allow(clippy::cast_precision_loss)]
        let share = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        };
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let filled = ((share * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let _ = writeln!(
            out,
            "{:<9}{}{} {:>5.1}% ({count})",
            label.as_str(),
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            share * 100.0
        );
    }

    out
}

/// Comments sheet with `No.`, `Comment`, `Sentiment` columns and a pie chart
/// at `E1`, fed from the per-label counts on the tally sheet.
pub(crate) fn render_xlsx(output: &PipelineOutput) -> anyhow::Result<Vec<u8>> {
    let header = Format::new().set_bold();

    let mut comments = Worksheet::new();
    comments.set_name(COMMENTS_SHEET)?;
    comments.set_column_width(1, 60)?;
    comments.set_column_width(2, 12)?;
    for (col, title) in (0u16..).zip(["No.", "Comment", "Sentiment"]) {
        comments.write_string_with_format(0, col, title, &header)?;
    }
    for row in &output.rows {
        let index = u32::try_from(row.index).context("comment index does not fit a sheet row")?;
        comments.write_number(index, 0, f64::from(index))?;
        comments.write_string(index, 1, &row.text)?;
        comments.write_string(index, 2, row.label.as_str())?;
    }

    let mut tally = Worksheet::new();
    tally.set_name(TALLY_SHEET)?;
    tally.write_string_with_format(0, 0, "Sentiment", &header)?;
    tally.write_string_with_format(0, 1, "Count", &header)?;
    let mut last_row = 0u32;
    for (row, (label, count)) in (1u32..).zip(output.tally.iter()) {
        let count = u32::try_from(count).context("sentiment count does not fit a cell")?;
        tally.write_string(row, 0, label.as_str())?;
        tally.write_number(row, 1, f64::from(count))?;
        last_row = row;
    }

    let mut labels = ChartDataLabel::new();
    labels
        .show_category_name()
        .show_percentage()
        .set_num_format("0.0%");

    let mut chart = Chart::new(ChartType::Pie);
    chart
        .add_series()
        .set_name("Comments")
        .set_categories((TALLY_SHEET, 1, 0, last_row, 0))
        .set_values((TALLY_SHEET, 1, 1, last_row, 1))
        .set_data_label(&labels);
    chart.title().set_name("Sentiment distribution");
    comments.insert_chart(CHART_ROW, CHART_COL, &chart)?;

    let mut workbook = Workbook::new();
    workbook.push_worksheet(comments);
    workbook.push_worksheet(tally);
    workbook
        .save_to_buffer()
        .context("failed to build xlsx report")
}

/// Markdown table cells cannot hold pipes or line breaks.
fn escape_cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

pub(crate) fn write_report(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write report to {}", path.display()))
}
