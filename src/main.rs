use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use prompt_regression::{logger, App, Config};

/// 提示词回归测试：把自然语言指令交给 LLM 生成浏览器步骤并执行
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 提示词文本文件（也可通过 PROMPT_FILE 指定）
    prompt_file: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 报告输出路径
    #[arg(short, long)]
    output: Option<String>,

    /// 显示浏览器窗口
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(output) = cli.output {
        config.output_report_file = output;
    }
    if cli.headed {
        config.headless = false;
    }

    // 初始化日志
    logger::init(config.verbose_logging);

    let prompt_file = cli
        .prompt_file
        .or_else(|| config.prompt_file.clone().map(PathBuf::from))
        .context("未指定提示词文件（命令行参数或 PROMPT_FILE）")?;

    // 初始化并运行应用
    App::initialize(config)?.run(&prompt_file).await?;

    Ok(())
}
