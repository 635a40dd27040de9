//! 元素定位
//!
//! [`Locator`] 只能通过 [`Locator::for_send_keys`] / [`Locator::for_click`] 构造，
//! 两者分别编码了 SEND_KEYS 和 CLICK 支持的选择器集合。

use std::fmt;

use crate::models::SelectorKind;

/// 已确认受支持的元素定位方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    Name(String),
    XPath(String),
    Css(String),
    ClassName(String),
    LinkText(String),
}

impl Locator {
    /// SEND_KEYS 支持: ID / NAME / XPATH / CSS_SELECTOR / CLASS_NAME
    pub fn for_send_keys(kind: &SelectorKind, value: &str) -> Option<Self> {
        let value = value.to_string();
        match kind {
            SelectorKind::Id => Some(Locator::Id(value)),
            SelectorKind::Name => Some(Locator::Name(value)),
            SelectorKind::XPath => Some(Locator::XPath(value)),
            SelectorKind::CssSelector => Some(Locator::Css(value)),
            SelectorKind::ClassName => Some(Locator::ClassName(value)),
            SelectorKind::LinkText | SelectorKind::None | SelectorKind::Unrecognized(_) => None,
        }
    }

    /// CLICK 在 SEND_KEYS 的基础上额外支持 LINK_TEXT
    pub fn for_click(kind: &SelectorKind, value: &str) -> Option<Self> {
        match kind {
            SelectorKind::LinkText => Some(Locator::LinkText(value.to_string())),
            other => Self::for_send_keys(other, value),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Id(v)
            | Locator::Name(v)
            | Locator::XPath(v)
            | Locator::Css(v)
            | Locator::ClassName(v)
            | Locator::LinkText(v) => v,
        }
    }

    /// 转换成浏览器可直接查询的选择器
    pub fn to_query(&self) -> Query {
        match self {
            Locator::Id(v) => Query::Css(format!("[id={}]", css_string(v))),
            Locator::Name(v) => Query::Css(format!("[name={}]", css_string(v))),
            Locator::ClassName(v) => Query::Css(format!("[class~={}]", css_string(v))),
            Locator::Css(v) => Query::Css(v.clone()),
            Locator::XPath(v) => Query::XPath(v.clone()),
            Locator::LinkText(v) => Query::XPath(format!("//a[normalize-space(.)={}]", xpath_string(v.trim()))),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Locator::Id(_) => "id",
            Locator::Name(_) => "name",
            Locator::XPath(_) => "xpath",
            Locator::Css(_) => "css",
            Locator::ClassName(_) => "class",
            Locator::LinkText(_) => "link_text",
        };
        write!(f, "{}={:?}", kind, self.value())
    }
}

/// 浏览器查询语句
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Css(String),
    XPath(String),
}

/// CSS 属性选择器中的字符串字面量
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// XPath 1.0 没有转义语法，同时含两种引号时用 concat() 拼接
fn xpath_string(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    let parts: Vec<String> = value.split('"').map(|p| format!("\"{}\"", p)).collect();
    format!("concat({})", parts.join(", '\"', "))
}
