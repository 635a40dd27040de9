/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::models::{BatchReport, Verdict};

/// 记录程序启动信息
///
/// # 参数
/// - `model`: LLM 模型名称
/// - `prompt_file`: 提示词文件路径
pub fn log_startup(model: &str, prompt_file: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 提示词回归测试");
    info!("🤖 模型: {}", model);
    info!("📄 提示词文件: {}", prompt_file);
    info!("{}", "=".repeat(60));
}

/// 记录提示加载信息
///
/// # 参数
/// - `total`: 提示总数
/// - `max_concurrent`: 最大并发数
pub fn log_prompts_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 条待处理的提示", total);
    info!("📋 最大并发数: {}", max_concurrent);
}

/// 打印每条提示的结果和最终统计信息
///
/// # 参数
/// - `report`: 批次报告
/// - `report_path`: 报告文件路径
pub fn print_final_stats(report: &BatchReport, report_path: &str) {
    for result in report.results() {
        let icon = match result.verdict() {
            Verdict::Passed => "✅",
            Verdict::Failed => "❌",
        };
        info!("\n{}", "─".repeat(60));
        info!(
            "{} 提示 {}: {}",
            icon,
            result.sequence_number,
            truncate_text(&result.original_text, 60)
        );
        for line in result.outcome_text().lines() {
            info!("    {}", line);
        }
    }

    let summary = report.summary();
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 通过: {}/{}", summary.passed, summary.total);
    info!("❌ 失败: {}", summary.failed);
    info!("⚠️ 警告步骤: {}", summary.warnings);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("打开网页", 2), "打开...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
