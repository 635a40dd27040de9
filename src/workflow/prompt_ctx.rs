//! 提示处理上下文
//!
//! 封装"我正在处理第几条提示"这一信息

use std::fmt::Display;

/// 提示处理上下文
#[derive(Debug, Clone)]
pub struct PromptCtx {
    /// 输入顺序（从1开始）
    pub sequence_number: usize,

    /// 本批次提示总数（仅用于日志显示）
    pub total: usize,

    /// 提示原文
    pub text: String,
}

impl PromptCtx {
    /// 创建新的提示上下文
    pub fn new(sequence_number: usize, total: usize, text: impl Into<String>) -> Self {
        Self {
            sequence_number,
            total,
            text: text.into(),
        }
    }
}

impl Display for PromptCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[提示 {}/{}]", self.sequence_number, self.total)
    }
}
