//! 报告写入服务 - 业务能力层
//!
//! 只负责"把排好序的报告写成表格行"能力，不关心流程

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::FileError;
use crate::models::{BatchReport, PromptResult};

/// 报告中的一行，列名即表头
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Prompt Number")]
    pub prompt_number: usize,
    #[serde(rename = "Prompt")]
    pub prompt: String,
    #[serde(rename = "Test Steps")]
    pub test_steps: String,
    #[serde(rename = "Execution Results")]
    pub execution_results: String,
}

impl ReportRow {
    pub const HEADERS: [&'static str; 4] = ["Prompt Number", "Prompt", "Test Steps", "Execution Results"];
}

impl From<&PromptResult> for ReportRow {
    fn from(result: &PromptResult) -> Self {
        Self {
            prompt_number: result.sequence_number,
            prompt: result.original_text.clone(),
            test_steps: result.compiled.to_pretty_json(),
            execution_results: result.outcome_text(),
        }
    }
}

/// 报告写入服务
///
/// 职责：
/// - 每个 PromptResult 一行，顺序与报告一致
/// - 默认输出 CSV 表格（带表头），扩展名为 `.json` 时输出 JSON 数组
pub struct ReportWriter {
    report_file_path: PathBuf,
}

impl ReportWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_file_path
    }

    /// 生成表格行
    pub fn rows(report: &BatchReport) -> Vec<ReportRow> {
        report.results().iter().map(ReportRow::from).collect()
    }

    /// 写入报告
    pub fn write(&self, report: &BatchReport) -> Result<(), FileError> {
        let path = self.report_file_path.display().to_string();
        debug!("写入报告: {} | 共 {} 行", path, report.len());

        let rows = Self::rows(report);
        if self.is_json() {
            let content = serde_json::to_string_pretty(&rows).map_err(|e| FileError::write_failed(&path, e))?;
            fs::write(&self.report_file_path, content).map_err(|e| FileError::write_failed(&path, e))?;
        } else {
            write_csv(&self.report_file_path, &rows).map_err(|e| FileError::write_failed(&path, e))?;
        }

        Ok(())
    }

    fn is_json(&self) -> bool {
        self.report_file_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

/// 空报告也写出表头
fn write_csv(path: &Path, rows: &[ReportRow]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(ReportRow::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::with_path("test_results.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, ActionSequence, PromptOutcome, StepOutcome, WireStep};

    fn sample_report() -> BatchReport {
        let compiled = ActionSequence::new(vec![Action::from_wire(WireStep {
            action: "OPEN_URL".to_string(),
            input_value: "https://example.com".to_string(),
            ..WireStep::default()
        })]);

        BatchReport::new(vec![
            PromptResult::compile_failed(2, "second", "no array"),
            PromptResult {
                sequence_number: 1,
                original_text: "first".to_string(),
                compiled,
                outcome: PromptOutcome::Executed(vec![StepOutcome::ok(1, "已打开 URL: https://example.com")]),
            },
        ])
    }

    #[test]
    fn test_rows_follow_report_order() {
        let rows = ReportWriter::rows(&sample_report());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].prompt_number, 1);
        assert!(rows[0].test_steps.contains("OPEN_URL"));
        assert_eq!(rows[0].execution_results, "✅ 步骤 1: 已打开 URL: https://example.com");
        assert_eq!(rows[1].prompt_number, 2);
        assert!(rows[1].test_steps.is_empty());
        assert!(rows[1].execution_results.contains("no array"));
    }

    #[test]
    fn test_write_uses_column_headers() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::with_path(dir.path().join("report.json"));

        writer.write(&sample_report()).unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value[0]["Prompt Number"], 1);
        assert_eq!(value[1]["Prompt"], "second");
        assert!(value[0]["Execution Results"].as_str().unwrap().starts_with("✅"));
    }

    #[test]
    fn test_write_csv_keeps_multiline_cells() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::with_path(dir.path().join("report.csv"));

        writer.write(&sample_report()).unwrap();

        let mut reader = csv::Reader::from_path(writer.path()).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, ReportRow::HEADERS);

        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "1");
        assert_eq!(&records[0][1], "first");
        assert!(records[0][2].contains("\n"));
        assert!(records[0][2].contains("OPEN_URL"));
        assert_eq!(&records[1][3], "❌ AI 调用失败: no array");
    }

    #[test]
    fn test_write_csv_for_empty_report_has_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::with_path(dir.path().join("empty.csv"));

        writer.write(&BatchReport::default()).unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content.trim_end(), "Prompt Number,Prompt,Test Steps,Execution Results");
    }
}
