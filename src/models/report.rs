//! 报告模型
//!
//! 每条输入提示对应且仅对应一个 [`PromptResult`]，失败信息以文本形式嵌入，
//! 不会被静默丢弃。

use super::action::ActionSequence;
use super::outcome::{StepOutcome, StepStatus};

/// 单条提示的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// 编译失败，动作序列为空
    CompileFailed(String),
    /// 编译成功但无法创建浏览器会话
    ExecutionFailed(String),
    /// 正常执行，每个动作一条结果
    Executed(Vec<StepOutcome>),
}

/// 提示级别的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

/// 单条提示的完整结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResult {
    /// 输入顺序（从 1 开始），也是最终报告的排序键
    pub sequence_number: usize,
    pub original_text: String,
    pub compiled: ActionSequence,
    pub outcome: PromptOutcome,
}

impl PromptResult {
    pub fn compile_failed(sequence_number: usize, original_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sequence_number,
            original_text: original_text.into(),
            compiled: ActionSequence::empty(),
            outcome: PromptOutcome::CompileFailed(message.into()),
        }
    }

    /// 没有失败步骤即视为通过，警告不影响判定
    pub fn verdict(&self) -> Verdict {
        match &self.outcome {
            PromptOutcome::Executed(steps) if steps.iter().all(|s| s.status != StepStatus::Fail) => {
                Verdict::Passed
            }
            _ => Verdict::Failed,
        }
    }

    pub fn warning_count(&self) -> usize {
        match &self.outcome {
            PromptOutcome::Executed(steps) => steps.iter().filter(|s| s.status == StepStatus::Warn).count(),
            _ => 0,
        }
    }

    /// 执行结果文本，每行一个步骤
    pub fn outcome_text(&self) -> String {
        match &self.outcome {
            PromptOutcome::CompileFailed(msg) => format!("❌ AI 调用失败: {}", msg),
            PromptOutcome::ExecutionFailed(msg) => format!("❌ 浏览器执行失败: {}", msg),
            PromptOutcome::Executed(steps) => steps
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// 报告统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// 整个批次的报告，始终按 sequence_number 排序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    results: Vec<PromptResult>,
}

impl BatchReport {
    pub fn new(mut results: Vec<PromptResult>) -> Self {
        results.sort_by_key(|r| r.sequence_number);
        Self { results }
    }

    pub fn results(&self) -> &[PromptResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        self.results.iter().fold(
            ReportSummary {
                total: self.results.len(),
                ..Default::default()
            },
            |mut acc, r| {
                match r.verdict() {
                    Verdict::Passed => acc.passed += 1,
                    Verdict::Failed => acc.failed += 1,
                }
                acc.warnings += r.warning_count();
                acc
            },
        )
    }
}
