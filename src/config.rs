use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, FileError};

/// 程序配置
///
/// 先取默认值，再叠加可选的 TOML 配置文件，最后由环境变量覆盖。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    // --- 浏览器配置 ---
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 浏览器可执行文件路径，不填则自动探测
    pub chrome_executable: Option<String>,
    /// 已运行浏览器的调试端口，填写后改为连接模式
    pub browser_debug_port: Option<u16>,
    // --- 步骤执行时序（毫秒） ---
    pub element_timeout_ms: u64,
    pub open_url_settle_ms: u64,
    pub click_settle_ms: u64,
    pub go_back_settle_ms: u64,
    // --- 输入输出 ---
    /// 提示词文本文件
    pub prompt_file: Option<String>,
    /// 结果报告文件
    pub output_report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_model_name: "llama3-70b-8192".to_string(),
            llm_temperature: 0.2,
            headless: true,
            chrome_executable: None,
            browser_debug_port: None,
            element_timeout_ms: 10_000,
            open_url_settle_ms: 3_000,
            click_settle_ms: 2_000,
            go_back_settle_ms: 2_000,
            prompt_file: None,
            output_report_file: "test_results.csv".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，再用环境变量覆盖
    pub fn from_file(path: &Path) -> Result<Self, crate::error::AppError> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(FileError::NotFound { path: display }.into());
        }
        let content = std::fs::read_to_string(path).map_err(|e| FileError::read_failed(&display, e))?;
        let config: Config = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: display,
            source,
        })?;
        Ok(config.with_env_overrides()?)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GROQ_API_KEY"))
                .unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_temperature: parse_env("LLM_TEMPERATURE", "f32")?.unwrap_or(self.llm_temperature),
            headless: parse_env("HEADLESS", "bool")?.unwrap_or(self.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(self.chrome_executable),
            browser_debug_port: parse_env("BROWSER_DEBUG_PORT", "u16")?.or(self.browser_debug_port),
            element_timeout_ms: parse_env("ELEMENT_TIMEOUT_MS", "u64")?.unwrap_or(self.element_timeout_ms),
            open_url_settle_ms: parse_env("OPEN_URL_SETTLE_MS", "u64")?.unwrap_or(self.open_url_settle_ms),
            click_settle_ms: parse_env("CLICK_SETTLE_MS", "u64")?.unwrap_or(self.click_settle_ms),
            go_back_settle_ms: parse_env("GO_BACK_SETTLE_MS", "u64")?.unwrap_or(self.go_back_settle_ms),
            prompt_file: std::env::var("PROMPT_FILE").ok().or(self.prompt_file),
            output_report_file: std::env::var("OUTPUT_REPORT_FILE").unwrap_or(self.output_report_file),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }

    /// 校验配置
    ///
    /// API 密钥必须在提交任何任务之前就存在。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        Ok(())
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn open_url_settle(&self) -> Duration {
        Duration::from_millis(self.open_url_settle_ms)
    }

    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    pub fn go_back_settle(&self) -> Duration {
        Duration::from_millis(self.go_back_settle_ms)
    }
}

/// 读取并解析环境变量；变量不存在时返回 None，值非法时报错
fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_uses_source_timings() {
        let config = Config::default();
        assert_eq!(config.element_timeout(), Duration::from_secs(10));
        assert_eq!(config.open_url_settle(), Duration::from_secs(3));
        assert_eq!(config.click_settle(), Duration::from_secs(2));
        assert_eq!(config.go_back_settle(), Duration::from_secs(2));
        assert!((config.llm_temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_rejects_missing_api_key() {
        let config = Config {
            llm_api_key: "   ".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EnvVarNotFound { .. })
        ));

        let config = Config {
            llm_api_key: "gsk_test".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_reads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "llm_model_name = \"my-model\"\nclick_settle_ms = 0\nheadless = false"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        // 环境变量可能覆盖模型名，这里只检查不会被环境变量影响的字段
        assert_eq!(config.click_settle_ms, 0);
        assert_eq!(config.output_report_file, "test_results.csv");
    }

    #[test]
    fn test_from_file_missing_path() {
        let err = Config::from_file(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("文件不存在"));
    }
}
