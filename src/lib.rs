//! # Prompt Regression
//!
//! 把自然语言测试指令编译成浏览器动作并执行，逐条输出通过/失败结果
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器会话），只暴露能力
//! - `BrowserSession` / `SessionFactory` - 浏览器能力接口
//! - `ChromiumSession` - 基于 chromiumoxide 的实现，唯一的 page owner
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条提示
//! - `segment` - 文本切分能力
//! - `LlmService` - 文本生成能力
//! - `ActionCompiler` - 指令 → 动作序列
//! - `ReportWriter` - 写报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条提示"的完整处理流程
//! - `StepExecutor` - 逐个执行动作，单步失败不影响后续步骤
//! - `PromptFlow` - 流程编排（compile → execute）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理，管理并发和结果汇总
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use browser::ChromiumLauncher;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Action, ActionSequence, BatchReport, PromptResult, StepOutcome};
pub use orchestrator::{BatchOrchestrator, ProgressObserver};
pub use services::{segment, ActionCompiler};
pub use workflow::{PromptFlow, StepExecutor, StepTiming};
