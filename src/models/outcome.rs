use std::fmt;

use serde::Serialize;

/// 步骤状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepStatus {
    Ok,
    Warn,
    Fail,
}

impl StepStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            StepStatus::Ok => "✅",
            StepStatus::Warn => "⚠️",
            StepStatus::Fail => "❌",
        }
    }
}

/// 单个动作的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// 从 1 开始
    pub index: usize,
    pub status: StepStatus,
    pub message: String,
}

impl StepOutcome {
    pub fn ok(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            status: StepStatus::Ok,
            message: message.into(),
        }
    }

    pub fn warn(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            status: StepStatus::Warn,
            message: message.into(),
        }
    }

    pub fn fail(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            status: StepStatus::Fail,
            message: message.into(),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 步骤 {}: {}", self.status.icon(), self.index, self.message)
    }
}
