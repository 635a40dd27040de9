pub mod compiler;
pub mod llm_service;
pub mod report_writer;
pub mod segmenter;

pub use compiler::{extract_json_array, ActionCompiler};
pub use llm_service::{LlmService, TextGenerator};
pub use report_writer::{ReportRow, ReportWriter};
pub use segmenter::segment;
