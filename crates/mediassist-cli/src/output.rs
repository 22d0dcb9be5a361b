//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use mediassist_domain::{ExtractedRecord, KnowledgeBase, LoadSummary, Speaker, Transcript};
use mediassist_extractor::AnalysisReport;
use serde_json::{json, Map, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

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

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extracted patient record.
    pub fn format_record(&self, record: &ExtractedRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&record_json(record))?),
            OutputFormat::Quiet => Ok(record
                .fields()
                .map(|(field, value)| format!("{}: {}", field, value))
                .chain(record.unrecognized().iter().map(|(k, v)| format!("{}: {}", k, v)))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => self.format_record_table(record),
        }
    }

    fn format_record_table(&self, record: &ExtractedRecord) -> Result<String> {
        if record.is_empty() {
            return Ok(self.colorize("No information extracted.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (field, value) in record.fields() {
            builder.push_record([field.as_str(), value]);
        }
        for (key, value) in record.unrecognized() {
            builder.push_record([format!("{} (unrecognized)", key), value.clone()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let missing = record.missing();
        if missing.is_empty() {
            return Ok(table.to_string());
        }

        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        Ok(format!(
            "{}\n{}",
            table,
            self.colorize(&format!("Not provided: {}", names.join(", ")), "yellow")
        ))
    }

    /// Format questionnaire answers.
    pub fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report
                .answers
                .iter()
                .map(|a| a.answer.clone().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Question", "Answer"]);
                for entry in &report.answers {
                    let answer = match (&entry.answer, &entry.error) {
                        (Some(answer), _) => answer.clone(),
                        (None, Some(error)) => format!("error: {}", error),
                        (None, None) => String::new(),
                    };
                    builder.push_record([entry.question.clone(), answer]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a loader summary.
    pub fn format_load_summary(&self, summary: &LoadSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let results: Vec<Value> = summary
                    .results
                    .iter()
                    .map(|r| {
                        json!({
                            "file_path": r.file_path.display().to_string(),
                            "success": r.success,
                            "error": r.error,
                            "pages_extracted": r.pages_extracted,
                            "pages_skipped": r.pages_skipped,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "knowledge_base": summary.knowledge_base,
                    "total": summary.total(),
                    "succeeded": summary.succeeded(),
                    "results": results,
                }))?)
            }
            OutputFormat::Quiet => Ok(format!("{}/{}", summary.succeeded(), summary.total())),
            OutputFormat::Table => {
                let mut out = String::new();
                if !summary.results.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["File", "Status", "Pages", "Skipped"]);
                    for r in &summary.results {
                        let status = match &r.error {
                            None => "ok".to_string(),
                            Some(e) => e.clone(),
                        };
                        builder.push_record([
                            r.file_path.display().to_string(),
                            status,
                            r.pages_extracted.to_string(),
                            r.pages_skipped.to_string(),
                        ]);
                    }
                    let mut table = builder.build();
                    table
                        .with(Style::rounded())
                        .with(Modify::new(Rows::first()).with(Alignment::center()));
                    out.push_str(&table.to_string());
                    out.push('\n');
                }

                let line = summary.to_string();
                if summary.succeeded() == summary.total() {
                    out.push_str(&self.success(&line));
                } else {
                    out.push_str(&self.warning(&line));
                }
                Ok(out)
            }
        }
    }

    /// Format the knowledge base list.
    pub fn format_knowledge_bases(&self, bases: &[KnowledgeBase]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let names: Vec<&str> = bases.iter().map(|kb| kb.name.as_str()).collect();
                Ok(serde_json::to_string_pretty(&names)?)
            }
            OutputFormat::Quiet => Ok(bases
                .iter()
                .map(|kb| kb.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if bases.is_empty() {
                    return Ok(self.colorize("No knowledge bases found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Knowledge base"]);
                for kb in bases {
                    builder.push_record([kb.name.as_str()]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format a transcript as `role: content` lines.
    pub fn format_transcript(&self, transcript: &Transcript) -> String {
        if transcript.is_empty() {
            return self.info("No messages yet.");
        }

        transcript
            .turns()
            .iter()
            .map(|turn| {
                let label = match turn.role {
                    Speaker::Assistant => self.colorize("assistant", "cyan"),
                    Speaker::User => self.colorize("user", "magenta"),
                };
                format!("{}: {}", label, turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format an assistant message in the chat.
    pub fn assistant(&self, message: &str) -> String {
        format!("{} {}", self.colorize("assistant>", "cyan"), message)
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
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// JSON object for a record: known fields first, unknown keys under `unrecognized`.
pub fn record_json(record: &ExtractedRecord) -> Value {
    let mut fields = Map::new();
    for (field, value) in record.fields() {
        fields.insert(field.as_str().to_string(), Value::String(value.to_string()));
    }
    if !record.unrecognized().is_empty() {
        let extra: Map<String, Value> = record
            .unrecognized()
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        fields.insert("unrecognized".to_string(), Value::Object(extra));
    }
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediassist_domain::FileImportResult;
    use mediassist_extractor::QuestionAnswer;

    fn create_test_record() -> ExtractedRecord {
        ExtractedRecord::from_pairs([("name", "Jane Doe"), ("age", "34"), ("blood type", "O+")])
    }

    #[test]
    fn test_record_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["name"], "Jane Doe");
        assert_eq!(value["unrecognized"]["blood type"], "O+");
    }

    #[test]
    fn test_record_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        assert!(output.contains("Field"));
        assert!(output.contains("Jane Doe"));
        assert!(output.contains("Not provided: condition"));
    }

    #[test]
    fn test_empty_record() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_record(&ExtractedRecord::empty()).unwrap();
        assert!(output.contains("No information extracted"));
    }

    #[test]
    fn test_analysis_table_shows_errors() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = AnalysisReport {
            answers: vec![
                QuestionAnswer::answered("What is the patient's name?", "Jane"),
                QuestionAnswer::failed("What is the patient's age?", "timeout"),
            ],
        };
        let output = formatter.format_analysis(&report).unwrap();
        assert!(output.contains("Jane"));
        assert!(output.contains("error: timeout"));
    }

    #[test]
    fn test_load_summary_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let mut summary = LoadSummary::new("guidelines");
        summary.results.push(FileImportResult::succeeded("a.pdf", 3, 0));
        summary.results.push(FileImportResult::failed("b.pdf", "no text extracted"));
        assert_eq!(formatter.format_load_summary(&summary).unwrap(), "1/2");
    }

    #[test]
    fn test_load_summary_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut summary = LoadSummary::new("guidelines");
        summary.results.push(FileImportResult::failed("b.pdf", "no text extracted"));
        let output = formatter.format_load_summary(&summary).unwrap();
        assert!(output.contains("no text extracted"));
        assert!(output.contains("⚠ 0/1 files loaded into 'guidelines'"));
    }

    #[test]
    fn test_empty_knowledge_bases() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_knowledge_bases(&[]).unwrap();
        assert!(output.contains("No knowledge bases found"));
    }

    #[test]
    fn test_transcript_lines() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut transcript = Transcript::new();
        transcript.push_assistant("What is your name?");
        transcript.push_user("Jane");
        assert_eq!(
            formatter.format_transcript(&transcript),
            "assistant: What is your name?\nuser: Jane"
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
