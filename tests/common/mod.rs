//! 测试用的内存实现：脚本化的文本生成服务和合成页面的浏览器
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use prompt_regression::error::{BrowserError, CompileError};
use prompt_regression::infrastructure::{BrowserSession, Locator, PageElement, SessionFactory, WaitCondition};
use prompt_regression::services::TextGenerator;
use prompt_regression::StepTiming;

/// 所有延迟为零的时序
pub fn instant_timing() -> StepTiming {
    StepTiming {
        element_timeout: Duration::from_millis(50),
        open_url_settle: Duration::ZERO,
        click_settle: Duration::ZERO,
        go_back_settle: Duration::ZERO,
    }
}

// ========== 文本生成 ==========

/// 按指令原文返回预设响应；未登记的指令返回空数组
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: HashMap<String, Result<String, String>>,
}

impl ScriptedGenerator {
    pub fn respond(mut self, instruction: &str, response: &str) -> Self {
        self.responses
            .insert(instruction.to_string(), Ok(response.to_string()));
        self
    }

    pub fn fail(mut self, instruction: &str, reason: &str) -> Self {
        self.responses
            .insert(instruction.to_string(), Err(reason.to_string()));
        self
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _system_message: &str, user_message: &str) -> Result<String, CompileError> {
        tokio::task::yield_now().await;
        match self.responses.get(user_message) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(reason)) => Err(CompileError::ServiceFailed {
                model: "scripted".to_string(),
                source: reason.clone().into(),
            }),
            None => Ok("[]".to_string()),
        }
    }
}

// ========== 合成页面 ==========

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub id: Option<String>,
    pub name: Option<String>,
    pub classes: Vec<String>,
    pub css: Option<String>,
    pub xpath: Option<String>,
    pub link_text: Option<String>,
    pub hidden: bool,
    pub panics_on_click: bool,
}

impl FakeElement {
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn matches(&self, locator: &Locator) -> bool {
        let eq = |field: &Option<String>, v: &str| field.as_deref() == Some(v);
        match locator {
            Locator::Id(v) => eq(&self.id, v),
            Locator::Name(v) => eq(&self.name, v),
            Locator::ClassName(v) => self.classes.iter().any(|c| c == v),
            Locator::Css(v) => eq(&self.css, v),
            Locator::XPath(v) => eq(&self.xpath, v),
            Locator::LinkText(v) => eq(&self.link_text, v.trim()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub title: String,
    pub elements: Vec<FakeElement>,
}

/// url → 页面
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pages: HashMap<String, FakePage>,
}

impl FakeSite {
    pub fn page(mut self, url: &str, title: &str, elements: Vec<FakeElement>) -> Self {
        self.pages.insert(
            url.to_string(),
            FakePage {
                title: title.to_string(),
                elements,
            },
        );
        self
    }
}

// ========== 浏览器 ==========

/// 会话工厂，记录创建次数和同时存活的会话数
#[derive(Clone, Default)]
pub struct FakeBrowser {
    site: FakeSite,
    pub events: Arc<Mutex<Vec<String>>>,
    pub created: Arc<AtomicUsize>,
    pub active: Arc<AtomicUsize>,
    pub max_active: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    failing_creations: HashSet<usize>,
}

impl FakeBrowser {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site,
            ..Default::default()
        }
    }

    /// 第 n 次（从 1 开始）创建会话时失败
    pub fn fail_creation(mut self, n: usize) -> Self {
        self.failing_creations.insert(n);
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionFactory for FakeBrowser {
    async fn create(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_creations.contains(&n) {
            return Err(BrowserError::session_setup_failed("chrome not found"));
        }

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        Ok(Box::new(FakeSession {
            browser: self.clone(),
            history: vec!["about:blank".to_string()],
            closed: false,
        }))
    }
}

struct FakeSession {
    browser: FakeBrowser,
    history: Vec<String>,
    closed: bool,
}

impl FakeSession {
    fn log(&self, event: String) {
        self.browser.events.lock().unwrap().push(event);
    }

    fn current_page(&self) -> Option<&FakePage> {
        self.history
            .last()
            .and_then(|url| self.browser.site.pages.get(url))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        // 让出执行权，给其它任务并发运行的机会
        tokio::task::yield_now().await;
        if url.starts_with("bad://") {
            return Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                source: "unsupported scheme".into(),
            });
        }
        self.log(format!("navigate:{}", url));
        self.history.push(url.to_string());
        Ok(())
    }

    async fn wait_for_element(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Box<dyn PageElement>, BrowserError> {
        let not_found = || BrowserError::ElementNotFound {
            locator: locator.to_string(),
            timeout_ms: timeout.as_millis(),
        };

        let element = self
            .current_page()
            .and_then(|page| page.elements.iter().find(|e| e.matches(locator)))
            .cloned()
            .ok_or_else(not_found)?;

        if condition == WaitCondition::Clickable && element.hidden {
            return Err(not_found());
        }

        Ok(Box::new(FakeHandle {
            description: locator.to_string(),
            element,
            events: Arc::clone(&self.browser.events),
        }))
    }

    async fn go_back(&mut self) -> Result<(), BrowserError> {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.log("back".to_string());
        Ok(())
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        Ok(self
            .current_page()
            .map(|p| p.title.clone())
            .unwrap_or_default())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if !self.closed {
            self.closed = true;
            self.browser.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.browser.active.fetch_sub(1, Ordering::SeqCst);
    }
}

struct FakeHandle {
    description: String,
    element: FakeElement,
    events: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PageElement for FakeHandle {
    async fn clear(&self) -> Result<(), BrowserError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("clear:{}", self.description));
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), BrowserError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("type:{}:{}", self.description, text));
        Ok(())
    }

    async fn click(&self) -> Result<(), BrowserError> {
        if self.element.panics_on_click {
            panic!("element detached");
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("click:{}", self.description));
        Ok(())
    }
}

/// 把四个字段拼成一个 JSON 步骤
pub fn step(action: &str, selector_type: &str, selector_value: &str, input_value: &str) -> String {
    serde_json::json!({
        "action": action,
        "selector_type": selector_type,
        "selector_value": selector_value,
        "input_value": input_value,
    })
    .to_string()
}

/// 把若干步骤拼成 JSON 数组
pub fn steps(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}
