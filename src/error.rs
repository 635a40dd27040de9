use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 指令编译错误
    #[error("编译错误: {0}")]
    Compile(#[from] CompileError),
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 批处理错误
    #[error("批处理错误: {0}")]
    Batch(#[from] BatchError),
}

/// 指令编译错误
///
/// 文本生成服务不可用，或者返回内容无法解析成动作序列。
/// 在单个提示的边界处被恢复，不会中断整个批次。
#[derive(Debug, Error)]
pub enum CompileError {
    /// 服务调用失败（网络错误或非成功响应）
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ServiceFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 响应中找不到 JSON 数组
    #[error("响应中未找到 JSON 数组。原始响应:\n{response}")]
    JsonArrayNotFound { response: String },
    /// JSON 数组解析失败
    #[error("LLM 返回的 JSON 无效: {source}\n内容:\n{content}")]
    InvalidJson {
        content: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 无法创建浏览器会话
    #[error("无法创建浏览器会话: {source}")]
    SessionSetupFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 等待元素超时
    #[error("等待元素 {locator} 超时 ({timeout_ms}ms)")]
    ElementNotFound { locator: String, timeout_ms: u128 },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 驱动层错误
    #[error("浏览器驱动错误: {source}")]
    DriverFault {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 批处理错误
///
/// 此时还没有任何 PromptResult 可以归属，只能中止整个运行。
#[derive(Debug, Error)]
pub enum BatchError {
    /// 工作池已关闭，无法再提交任务
    #[error("工作池已关闭: {0}")]
    WorkerPoolClosed(#[from] tokio::sync::AcquireError),
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::DriverFault {
            source: Box::new(err),
        }
    }
}

// ========== 便捷构造函数 ==========

impl BrowserError {
    /// 创建会话创建失败错误
    pub fn session_setup_failed(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        BrowserError::SessionSetupFailed {
            source: source.into(),
        }
    }

    /// 创建驱动层错误
    pub fn driver_fault(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        BrowserError::DriverFault {
            source: source.into(),
        }
    }
}

impl CompileError {
    /// 创建服务调用失败错误
    pub fn service_failed(model: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        CompileError::ServiceFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
