//! 提示处理流程 - 流程层
//!
//! 核心职责：定义"一条提示"的完整处理流程
//!
//! 流程顺序：
//! 1. compile：指令 → 动作序列（失败则直接结束，记录编译错误）
//! 2. execute：动作序列 → 步骤结果（会话创建失败则记录执行错误）
//!
//! 无论在哪一步失败，都恰好产出一个 [`PromptResult`]。

use tracing::{error, info, warn};

use crate::models::{PromptOutcome, PromptResult};
use crate::services::ActionCompiler;
use crate::utils::logging::truncate_text;
use crate::workflow::prompt_ctx::PromptCtx;
use crate::workflow::step_executor::StepExecutor;

/// 提示处理流程
///
/// - 编排 compile → execute
/// - 不持有浏览器会话，会话由执行器按需创建
pub struct PromptFlow {
    compiler: ActionCompiler,
    executor: StepExecutor,
}

impl PromptFlow {
    /// 创建新的提示处理流程
    pub fn new(compiler: ActionCompiler, executor: StepExecutor) -> Self {
        Self { compiler, executor }
    }

    pub async fn run(&self, ctx: &PromptCtx) -> PromptResult {
        info!("{} 提示: {}", ctx, truncate_text(&ctx.text, 80));

        // ========== 1. 编译 ==========
        let compiled = match self.compiler.compile(&ctx.text).await {
            Ok(compiled) => compiled,
            Err(e) => {
                error!("{} ❌ AI 调用失败: {}", ctx, e);
                return PromptResult::compile_failed(ctx.sequence_number, ctx.text.clone(), e.to_string());
            }
        };
        info!("{} ✓ 编译完成，共 {} 个步骤", ctx, compiled.len());

        // ========== 2. 执行 ==========
        let outcome = match self.executor.execute(&compiled).await {
            Ok(steps) => PromptOutcome::Executed(steps),
            Err(e) => {
                warn!("{} ❌ 浏览器执行失败: {}", ctx, e);
                PromptOutcome::ExecutionFailed(e.to_string())
            }
        };

        PromptResult {
            sequence_number: ctx.sequence_number,
            original_text: ctx.text.clone(),
            compiled,
            outcome,
        }
    }
}
