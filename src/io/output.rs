use crate::evaluation::{EvaluationResult, MissRecord};
use crate::report::EvaluationReport;
use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &EvaluationReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &EvaluationReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &EvaluationReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_matching(report)?;
        self.write_metrics(&report.evaluation)?;
        self.write_misses(&report.evaluation, report.max_misses)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &EvaluationReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Delivery Risk Accuracy Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            self.writer,
            "Thresholds: at risk >= {}, red zone >= {}",
            report.thresholds.at_risk, report.thresholds.red_zone
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_matching(&mut self, report: &EvaluationReport) -> anyhow::Result<()> {
        let m = &report.matching;
        writeln!(self.writer, "## Matching")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Records | Count |")?;
        writeln!(self.writer, "|---------|-------|")?;
        self.write_row("Predictions", m.predictions)?;
        self.write_row("Outcomes", m.outcomes)?;
        self.write_row("Matched", m.matched)?;
        self.write_row("Unmatched predictions", m.unmatched_predictions)?;
        self.write_row("Unmatched outcomes", m.unmatched_outcomes)?;
        self.write_row("Malformed", m.malformed_predictions + m.malformed_outcomes)?;
        self.write_row("Duplicates", m.duplicate_predictions + m.duplicate_outcomes)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_row(&mut self, label: &str, value: impl std::fmt::Display) -> anyhow::Result<()> {
        writeln!(self.writer, "| {label} | {value} |")?;
        Ok(())
    }

    fn write_metrics(&mut self, result: &EvaluationResult) -> anyhow::Result<()> {
        writeln!(self.writer, "## Accuracy")?;
        writeln!(self.writer)?;
        if !result.has_enough_data() {
            writeln!(self.writer, "Not enough labelled outcomes to evaluate.")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_row("Labelled", result.total_labelled)?;
        self.write_row("True positives", result.true_positive)?;
        self.write_row("False positives", result.false_positive)?;
        self.write_row("True negatives", result.true_negative)?;
        self.write_row("False negatives", result.false_negative)?;
        self.write_row("Accuracy", format!("{:.1}%", result.accuracy_pct()))?;
        self.write_row("Precision", format!("{:.1}%", result.precision_pct()))?;
        self.write_row("Recall", format!("{:.1}%", result.recall_pct()))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_misses(&mut self, result: &EvaluationResult, limit: usize) -> anyhow::Result<()> {
        if result.misses.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Misses ({})", result.misses.len())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Kind | Key | Predicted | Actual |")?;
        writeln!(self.writer, "|------|-----|-----------|--------|")?;
        for miss in result.misses.iter().take(limit) {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                miss.kind, miss.key, miss.predicted_band, miss.actual_label
            )?;
        }
        if result.misses.len() > limit {
            writeln!(self.writer)?;
            writeln!(self.writer, "_{} more not shown_", result.misses.len() - limit)?;
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl TerminalWriter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &EvaluationReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Delivery Risk Accuracy".bold().blue())?;
        writeln!(self.writer, "{}", "======================".blue())?;
        writeln!(self.writer)?;

        let m = &report.matching;
        writeln!(self.writer, "{}", "Matching:".bold())?;
        writeln!(
            self.writer,
            "  {} matched of {} outcomes ({} unmatched, {} malformed)",
            m.matched, m.outcomes, m.unmatched_outcomes, m.malformed_outcomes
        )?;
        writeln!(
            self.writer,
            "  {} predictions without outcome",
            m.unmatched_predictions
        )?;
        writeln!(self.writer)?;

        let result = &report.evaluation;
        if !result.has_enough_data() {
            writeln!(
                self.writer,
                "{}",
                "Not enough labelled outcomes to evaluate.".yellow()
            )?;
            return Ok(());
        }

        writeln!(self.writer, "{}", "Accuracy:".bold())?;
        writeln!(self.writer, "  Labelled: {}", result.total_labelled)?;
        writeln!(
            self.writer,
            "  TP: {}  FP: {}  TN: {}  FN: {}",
            result.true_positive.to_string().green(),
            result.false_positive.to_string().red(),
            result.true_negative.to_string().green(),
            result.false_negative.to_string().red()
        )?;
        writeln!(
            self.writer,
            "  Accuracy: {}  Precision: {}  Recall: {}",
            colored_pct(result.accuracy_pct()),
            colored_pct(result.precision_pct()),
            colored_pct(result.recall_pct())
        )?;
        writeln!(self.writer)?;

        self.write_misses(result, report.max_misses)
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_misses(&mut self, result: &EvaluationResult, limit: usize) -> anyhow::Result<()> {
        if result.misses.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{} ({}):",
            "Interesting misses".bold().yellow(),
            result.misses.len()
        )?;
        for miss in result.misses.iter().take(limit) {
            writeln!(self.writer, "  {}", format_miss(miss))?;
        }
        if result.misses.len() > limit {
            writeln!(self.writer, "  ... {} more", result.misses.len() - limit)?;
        }
        Ok(())
    }
}

fn format_miss(miss: &MissRecord) -> String {
    format!(
        "[{}] {} predicted {} but was {}",
        miss.kind.as_str().red(),
        miss.key,
        miss.predicted_band,
        miss.actual_label
    )
}

fn colored_pct(value: f64) -> ColoredString {
    let text = format!("{value:.1}%");
    match value {
        x if x >= 80.0 => text.green(),
        x if x >= 50.0 => text.yellow(),
        _ => text.red(),
    }
}

pub fn create_writer(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::stdout()),
    }
}
