//! 批量提示处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **切分**：把原始文本切成提示列表，按输入顺序编号
//! 2. **并发控制**：使用 Semaphore 限制同时运行的提示数量（固定为 1）
//! 3. **结果收集**：任务完成顺序不固定，结果通过 channel 汇总，最后按编号排序
//! 4. **进度通知**：每完成一条提示通知一次 [`ProgressObserver`]
//!
//! 浏览器会话很重，而且不支持并发复用，所以同一时刻只允许一个提示持有会话。
//! 提高并发数之前必须先保证每个任务的会话互相隔离。

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, warn};

use crate::error::{AppResult, BatchError};
use crate::models::{ActionSequence, BatchReport, PromptOutcome, PromptResult};
use crate::services::segment;
use crate::utils::logging::log_prompts_loaded;
use crate::workflow::{PromptCtx, PromptFlow};

/// 同时运行的提示数量上限
pub const MAX_CONCURRENT_UNITS: usize = 1;

/// 进度观察者，只读，不影响处理流程
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
}

/// 把进度写进日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        info!("📊 已处理 {}/{} 条提示", completed, total);
    }
}

/// 批量编排器
#[derive(Clone)]
pub struct BatchOrchestrator {
    flow: Arc<PromptFlow>,
}

impl BatchOrchestrator {
    pub fn new(flow: PromptFlow) -> Self {
        Self { flow: Arc::new(flow) }
    }

    /// 处理整段文本，返回按编号排序的报告
    pub async fn run(&self, raw_text: &str, progress: &dyn ProgressObserver) -> AppResult<BatchReport> {
        let prompts = segment(raw_text);
        if prompts.is_empty() {
            warn!("⚠️ 没有找到任何提示，程序结束");
            return Ok(BatchReport::default());
        }

        let total = prompts.len();
        log_prompts_loaded(total, MAX_CONCURRENT_UNITS);

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_UNITS));
        let (tx, mut rx) = mpsc::unbounded_channel::<PromptResult>();
        let flow = Arc::clone(&self.flow);

        // 按输入顺序提交；拿到许可后才 spawn，保证同一时刻只有一个任务在跑
        let submit = async move {
            for (idx, text) in prompts.into_iter().enumerate() {
                let ctx = PromptCtx::new(idx + 1, total, text);
                let permit = semaphore.clone().acquire_owned().await?;
                let flow = Arc::clone(&flow);
                let tx = tx.clone();

                tokio::spawn(async move {
                    let _permit = permit;
                    let result = run_unit(flow, ctx).await;
                    // 接收端只会在批次中止时关闭，此时结果已无处可去
                    let _ = tx.send(result);
                });
            }
            Ok::<(), BatchError>(())
        };

        let collect = async {
            let mut results = Vec::with_capacity(total);
            while results.len() < total {
                match rx.recv().await {
                    Some(result) => {
                        results.push(result);
                        progress.on_progress(results.len(), total);
                    }
                    None => break,
                }
            }
            results
        };

        let (submitted, results) = tokio::join!(submit, collect);
        submitted.map_err(|e| {
            error!("❌ 批处理中止: {}", e);
            e
        })?;

        Ok(BatchReport::new(results))
    }
}

/// 运行单条提示；任务 panic 也会被转换成一条结果，保证报告完整
async fn run_unit(flow: Arc<PromptFlow>, ctx: PromptCtx) -> PromptResult {
    let sequence_number = ctx.sequence_number;
    let original_text = ctx.text.clone();

    match tokio::spawn(async move { flow.run(&ctx).await }).await {
        Ok(result) => result,
        Err(e) => {
            error!("[提示 {}] 任务执行失败: {}", sequence_number, e);
            PromptResult {
                sequence_number,
                original_text,
                compiled: ActionSequence::empty(),
                outcome: PromptOutcome::ExecutionFailed(format!("任务执行失败: {}", e)),
            }
        }
    }
}
