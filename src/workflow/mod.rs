pub mod prompt_ctx;
pub mod prompt_flow;
pub mod step_executor;

pub use prompt_ctx::PromptCtx;
pub use prompt_flow::PromptFlow;
pub use step_executor::{StepExecutor, StepTiming};
