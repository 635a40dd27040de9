//! 提示词切分
//!
//! 把一整段文本切成互相独立的指令。分隔符有两种：
//! - `Prompt N:` 标签（标签本身丢弃）
//! - 空行（一行或多行只含空白字符的行）

use std::sync::LazyLock;

use regex::Regex;

static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Prompt[ \t]*\d+:|\n\s*\n").expect("segment boundary regex is valid")
});

/// 切分文本，返回去掉首尾空白后的非空片段
pub fn segment(text: &str) -> Vec<String> {
    BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
