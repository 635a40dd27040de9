//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Prompt>)
//!     ↓
//! workflow::PromptFlow (处理单条 Prompt：compile → execute)
//!     ↓
//! services (能力层：segment / compile / llm / report)
//!     ↓
//! infrastructure (基础设施：BrowserSession)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 只管批量调度和结果汇总
//! 2. **资源隔离**：浏览器会话只在单条提示的执行期间存在
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{BatchOrchestrator, LogProgress, ProgressObserver, MAX_CONCURRENT_UNITS};
