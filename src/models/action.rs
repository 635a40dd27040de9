//! 动作模型
//!
//! LLM 的输出不受任何契约约束，所以动作类型和选择器类型都保留了
//! "无法识别"的分支，而不是在解析阶段报错。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 动作类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    OpenUrl,
    SendKeys,
    Click,
    Wait,
    GoBack,
    VerifyTitle,
    /// 无法识别的动作，保留原始文本
    Unknown(String),
}

impl ActionKind {
    /// 从线上格式解析（大小写不敏感）
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN_URL" => ActionKind::OpenUrl,
            "SEND_KEYS" => ActionKind::SendKeys,
            "CLICK" => ActionKind::Click,
            "WAIT" => ActionKind::Wait,
            "GO_BACK" => ActionKind::GoBack,
            "VERIFY_TITLE" => ActionKind::VerifyTitle,
            _ => ActionKind::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::OpenUrl => "OPEN_URL",
            ActionKind::SendKeys => "SEND_KEYS",
            ActionKind::Click => "CLICK",
            ActionKind::Wait => "WAIT",
            ActionKind::GoBack => "GO_BACK",
            ActionKind::VerifyTitle => "VERIFY_TITLE",
            ActionKind::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 选择器类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorKind {
    Id,
    Name,
    XPath,
    CssSelector,
    ClassName,
    LinkText,
    /// 未指定选择器
    None,
    /// 无法识别的选择器，保留原始文本
    Unrecognized(String),
}

impl SelectorKind {
    /// 从线上格式解析（大小写不敏感，空串视为 None）
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" => SelectorKind::None,
            "id" => SelectorKind::Id,
            "name" => SelectorKind::Name,
            "xpath" => SelectorKind::XPath,
            "css_selector" => SelectorKind::CssSelector,
            "class_name" => SelectorKind::ClassName,
            "link_text" => SelectorKind::LinkText,
            _ => SelectorKind::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SelectorKind::Id => "ID",
            SelectorKind::Name => "NAME",
            SelectorKind::XPath => "XPATH",
            SelectorKind::CssSelector => "CSS_SELECTOR",
            SelectorKind::ClassName => "CLASS_NAME",
            SelectorKind::LinkText => "LINK_TEXT",
            SelectorKind::None => "",
            SelectorKind::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个浏览器动作
///
/// 由编译器生成后不再修改，执行器只读取。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub selector_kind: SelectorKind,
    pub selector_value: String,
    /// 含义取决于动作类型：URL、输入文本、等待秒数或期望的标题片段
    pub payload: String,
}

impl Action {
    pub fn from_wire(step: WireStep) -> Self {
        Self {
            kind: ActionKind::parse(&step.action),
            selector_kind: SelectorKind::parse(&step.selector_type),
            selector_value: step.selector_value,
            payload: step.input_value,
        }
    }

    pub fn to_wire(&self) -> WireStep {
        WireStep {
            action: self.kind.as_str().to_string(),
            selector_type: self.selector_kind.as_str().to_string(),
            selector_value: self.selector_value.clone(),
            input_value: self.payload.clone(),
        }
    }
}

/// LLM 返回的单个步骤（线上格式）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStep {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub selector_type: String,
    #[serde(default)]
    pub selector_value: String,
    #[serde(default)]
    pub input_value: String,
}

/// 一条指令对应的动作序列，顺序即执行顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSequence(Vec<Action>);

impl ActionSequence {
    pub fn new(actions: Vec<Action>) -> Self {
        Self(actions)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.0.iter()
    }

    /// 渲染成带缩进的线上格式 JSON，空序列渲染为空串
    pub fn to_pretty_json(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let steps: Vec<WireStep> = self.0.iter().map(Action::to_wire).collect();
        serde_json::to_string_pretty(&steps).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a ActionSequence {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_is_case_insensitive() {
        assert_eq!(ActionKind::parse("open_url"), ActionKind::OpenUrl);
        assert_eq!(ActionKind::parse(" Verify_Title "), ActionKind::VerifyTitle);
        assert_eq!(
            ActionKind::parse("SCROLL"),
            ActionKind::Unknown("SCROLL".to_string())
        );
    }

    #[test]
    fn test_selector_kind_parse() {
        assert_eq!(SelectorKind::parse("CSS_SELECTOR"), SelectorKind::CssSelector);
        assert_eq!(SelectorKind::parse("link_text"), SelectorKind::LinkText);
        assert_eq!(SelectorKind::parse(""), SelectorKind::None);
        assert_eq!(
            SelectorKind::parse("tag_name"),
            SelectorKind::Unrecognized("tag_name".to_string())
        );
    }

    #[test]
    fn test_pretty_json_uses_wire_field_names() {
        let seq = ActionSequence::new(vec![Action::from_wire(WireStep {
            action: "open_url".to_string(),
            input_value: "https://example.com".to_string(),
            ..WireStep::default()
        })]);

        let json = seq.to_pretty_json();
        assert!(json.contains("\"action\": \"OPEN_URL\""));
        assert!(json.contains("\"input_value\": \"https://example.com\""));
        assert!(ActionSequence::empty().to_pretty_json().is_empty());
    }
}
