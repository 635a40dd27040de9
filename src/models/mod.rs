pub mod action;
pub mod outcome;
pub mod report;

pub use action::{Action, ActionKind, ActionSequence, SelectorKind, WireStep};
pub use outcome::{StepOutcome, StepStatus};
pub use report::{BatchReport, PromptOutcome, PromptResult, ReportSummary, Verdict};
