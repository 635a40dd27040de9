use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::browser::ChromiumLauncher;
use crate::config::Config;
use crate::error::{AppResult, FileError};
use crate::models::BatchReport;
use crate::orchestrator::{BatchOrchestrator, LogProgress};
use crate::services::{ActionCompiler, LlmService, ReportWriter};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::{PromptFlow, StepExecutor, StepTiming};

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: BatchOrchestrator,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用
    ///
    /// 配置在这里校验，缺少 API 密钥时不会提交任何任务。
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        let llm_service = LlmService::new(&config);
        let compiler = ActionCompiler::new(Arc::new(llm_service));
        let executor = StepExecutor::new(
            Arc::new(ChromiumLauncher::new(&config)),
            StepTiming::from_config(&config),
        );
        let orchestrator = BatchOrchestrator::new(PromptFlow::new(compiler, executor));
        let report_writer = ReportWriter::with_path(&config.output_report_file);

        Ok(Self {
            config,
            orchestrator,
            report_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self, prompt_file: &Path) -> AppResult<BatchReport> {
        log_startup(&self.config.llm_model_name, &prompt_file.display().to_string());

        let raw_text = load_prompt_file(prompt_file)?;

        let report = self.orchestrator.run(&raw_text, &LogProgress).await?;

        info!("\n💾 正在写入报告...");
        self.report_writer.write(&report)?;

        print_final_stats(&report, &self.config.output_report_file);

        Ok(report)
    }
}

/// 读取提示词文件
fn load_prompt_file(path: &Path) -> Result<String, FileError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(FileError::NotFound { path: display });
    }
    std::fs::read_to_string(path).map_err(|e| FileError::read_failed(display, e))
}
