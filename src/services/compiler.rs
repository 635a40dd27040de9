//! 指令编译 - 业务能力层
//!
//! 把一条自然语言指令交给文本生成服务，再把返回文本解析成 [`ActionSequence`]。
//!
//! 生成服务并不保证只输出 JSON，前后可能夹杂说明文字，所以解析分两步：
//! 1. [`extract_json_array`] 截取第一个 `[` 到最后一个 `]` 之间的子串
//! 2. 用 `serde_json` 解析该子串
//!
//! 字段语义不在这里校验，缺失或类型不对的字段一律当作空串，交给执行器逐步降级处理。

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::CompileError;
use crate::models::{Action, ActionSequence, WireStep};
use crate::services::llm_service::TextGenerator;

/// 固定的系统指令
pub const SYSTEM_DIRECTIVE: &str = r#"You are an AI test assistant. Convert the user instruction into JSON test steps for browser automation. Each step must include action, selector_type, selector_value, input_value. Use OPEN_URL as action if a URL is to be opened. ONLY respond with a JSON array of steps, strictly no extra text.

Supported actions: OPEN_URL, SEND_KEYS, CLICK, WAIT, GO_BACK, VERIFY_TITLE.
Supported selector_type values: ID, NAME, XPATH, CSS_SELECTOR, CLASS_NAME, LINK_TEXT.

The JSON format must be like:
[
  {
    "action": "OPEN_URL",
    "selector_type": "",
    "selector_value": "",
    "input_value": "https://example.com"
  },
  {
    "action": "SEND_KEYS",
    "selector_type": "ID",
    "selector_value": "search-box",
    "input_value": "test input"
  },
  {
    "action": "CLICK",
    "selector_type": "XPATH",
    "selector_value": "//button[@id='submit']",
    "input_value": ""
  }
]"#;

/// 动作编译器
#[derive(Clone)]
pub struct ActionCompiler {
    generator: Arc<dyn TextGenerator>,
}

impl ActionCompiler {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 编译一条指令
    pub async fn compile(&self, instruction: &str) -> Result<ActionSequence, CompileError> {
        let response = self.generator.generate(SYSTEM_DIRECTIVE, instruction).await?;
        debug!("LLM 响应长度: {} 字符", response.len());
        parse_actions(&response)
    }
}

/// 从任意文本中截取第一个 `[` 到最后一个 `]` 之间的内容（含括号）
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// 解析生成服务的完整响应
pub fn parse_actions(response: &str) -> Result<ActionSequence, CompileError> {
    let json_str = extract_json_array(response).ok_or_else(|| {
        warn!("响应中未找到 JSON 数组");
        CompileError::JsonArrayNotFound {
            response: response.to_string(),
        }
    })?;

    let steps: Vec<JsonValue> = serde_json::from_str(json_str).map_err(|source| CompileError::InvalidJson {
        content: json_str.to_string(),
        source,
    })?;

    let actions = steps.iter().map(|step| Action::from_wire(wire_step(step))).collect();
    Ok(ActionSequence::new(actions))
}

/// 宽松地把一个 JSON 元素映射成线上格式的步骤
fn wire_step(value: &JsonValue) -> WireStep {
    let field = |name: &str| match value.get(name) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    };

    WireStep {
        action: field("action"),
        selector_type: field("selector_type"),
        selector_value: field("selector_value"),
        input_value: field("input_value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionKind, SelectorKind};
    use async_trait::async_trait;

    struct CannedGenerator(Result<String, String>);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, system_message: &str, _user_message: &str) -> Result<String, CompileError> {
            assert_eq!(system_message, SYSTEM_DIRECTIVE);
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(CompileError::EmptyResponse {
                    model: "canned".to_string(),
                }),
            }
        }
    }

    fn compiler(response: Result<&str, &str>) -> ActionCompiler {
        ActionCompiler::new(Arc::new(CannedGenerator(
            response.map(str::to_string).map_err(str::to_string),
        )))
    }

    #[test]
    fn test_extract_json_array_is_greedy() {
        assert_eq!(extract_json_array("x [1, [2]] y ] z"), Some("[1, [2]] y ]"));
        assert_eq!(extract_json_array("no brackets"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
    }

    #[tokio::test]
    async fn test_compile_tolerates_surrounding_prose() {
        let response = r#"Sure! Here you go: [{"action": "OPEN_URL", "selector_type": "", "selector_value": "", "input_value": "https://example.com"}, {"action": "click", "selector_type": "link_text", "selector_value": "More information...", "input_value": ""}] Hope that helps."#;

        let seq = compiler(Ok(response)).compile("open example").await.unwrap();

        assert_eq!(seq.len(), 2);
        let actions: Vec<_> = seq.iter().collect();
        assert_eq!(actions[0].kind, ActionKind::OpenUrl);
        assert_eq!(actions[0].payload, "https://example.com");
        assert_eq!(actions[1].kind, ActionKind::Click);
        assert_eq!(actions[1].selector_kind, SelectorKind::LinkText);
    }

    #[tokio::test]
    async fn test_compile_without_array_fails() {
        let err = compiler(Ok("I cannot help with that."))
            .compile("do something")
            .await
            .unwrap_err();

        match err {
            CompileError::JsonArrayNotFound { response } => {
                assert_eq!(response, "I cannot help with that.")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_compile_with_invalid_json_fails() {
        let err = compiler(Ok("[{\"action\": \"CLICK\",]"))
            .compile("click")
            .await
            .unwrap_err();

        assert!(matches!(err, CompileError::InvalidJson { ref content, .. } if content == "[{\"action\": \"CLICK\",]"));
    }

    #[tokio::test]
    async fn test_compile_propagates_service_failure() {
        let result = compiler(Err("offline")).compile("anything").await;
        tokio_test::assert_err!(result);
    }

    #[test]
    fn test_missing_and_odd_fields_default_to_empty() {
        let seq = parse_actions(r#"[{"action": "WAIT", "input_value": 2.5}, {"selector_type": "ID"}, 42]"#).unwrap();
        let actions: Vec<_> = seq.iter().collect();

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].kind, ActionKind::Wait);
        assert_eq!(actions[0].payload, "2.5");
        assert_eq!(actions[0].selector_kind, SelectorKind::None);
        assert_eq!(actions[1].kind, ActionKind::Unknown(String::new()));
        assert_eq!(actions[1].selector_value, "");
        assert_eq!(actions[2].kind, ActionKind::Unknown(String::new()));
    }

    #[test]
    fn test_empty_array_is_an_empty_sequence() {
        let seq = tokio_test::assert_ok!(parse_actions("Nothing to do: []"));
        assert!(seq.is_empty());
    }
}
