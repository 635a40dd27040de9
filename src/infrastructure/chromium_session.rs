//! Chromium 会话 - 基础设施层
//!
//! 持有唯一的 Page 资源，只暴露 [`BrowserSession`] 能力

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, Page};
use serde_json::Value as JsonValue;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use crate::error::BrowserError;
use crate::infrastructure::locator::{Locator, Query};
use crate::infrastructure::session::{BrowserSession, PageElement, WaitCondition};

/// 等待元素时的轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 关闭后等待浏览器进程退出的最长时间
const PROCESS_EXIT_TIMEOUT: Duration = Duration::from_secs(5);

const CLEAR_FIELD_JS: &str = r#"function() {
    this.focus();
    if ('value' in this) { this.value = ''; } else { this.textContent = ''; }
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
}"#;

const IS_CLICKABLE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden'
        && style.display !== 'none'
        && !this.disabled;
}"#;

/// 浏览器归属
pub enum Ownership {
    /// 会话自己启动的浏览器，关闭时连同进程一起结束
    Launched(Browser),
    /// 连接到的外部浏览器，关闭时只关掉自己打开的页面
    Attached(Browser),
}

/// Chromium 会话
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 持有 CDP 事件处理任务
/// - 不认识 Action / Prompt
pub struct ChromiumSession {
    ownership: Ownership,
    page: Page,
    handler: JoinHandle<()>,
    closed: bool,
}

impl ChromiumSession {
    pub fn new(ownership: Ownership, page: Page, handler: JoinHandle<()>) -> Self {
        Self {
            ownership,
            page,
            handler,
            closed: false,
        }
    }

    /// 执行 JS 代码并返回 JSON 结果
    async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue, BrowserError> {
        let result = self.page.evaluate(js_code.into()).await?;
        Ok(result.into_value().unwrap_or(JsonValue::Null))
    }

    async fn find(&self, query: &Query) -> Result<Element, BrowserError> {
        let element = match query {
            Query::Css(selector) => self.page.find_element(selector.as_str()).await?,
            Query::XPath(xpath) => self.page.find_xpath(xpath.as_str()).await?,
        };
        Ok(element)
    }
}

async fn is_clickable(element: &Element) -> bool {
    match element.call_js_fn(IS_CLICKABLE_JS, false).await {
        Ok(returns) => returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        Err(e) => {
            debug!("检查元素可点击状态失败: {}", e);
            false
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }

    async fn wait_for_element(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Box<dyn PageElement>, BrowserError> {
        let query = locator.to_query();
        debug!("等待元素 {} ({:?}, 超时 {:?})", locator, condition, timeout);

        let session: &ChromiumSession = self;
        let query = &query;
        let start = Instant::now();
        let found = poll_until(timeout, move || async move {
            let element = session.find(query).await.ok()?;
            let ready = condition == WaitCondition::Present || is_clickable(&element).await;
            ready.then_some(element)
        })
        .await;

        match found {
            Some(element) => {
                debug!("元素 {} 在 {}ms 后就绪", locator, start.elapsed().as_millis());
                Ok(Box::new(ChromiumElement(element)))
            }
            None => Err(BrowserError::ElementNotFound {
                locator: locator.to_string(),
                timeout_ms: timeout.as_millis(),
            }),
        }
    }

    async fn go_back(&mut self) -> Result<(), BrowserError> {
        self.eval("window.history.back()").await?;
        Ok(())
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = match &mut self.ownership {
            Ownership::Launched(browser) => {
                debug!("关闭浏览器进程");
                shut_down(browser).await
            }
            Ownership::Attached(_) => {
                debug!("关闭会话页面");
                self.page.clone().close().await.map_err(BrowserError::from)
            }
        };

        self.handler.abort();
        result
    }
}

/// 每隔 [`POLL_INTERVAL`] 调用一次 `attempt`，直到拿到结果或超时
///
/// 单次调用同样受剩余时间限制，总耗时不会超过 `limit`。
async fn poll_until<T, F, Fut>(limit: Duration, mut attempt: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + limit;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if let Ok(Some(found)) = timeout(remaining, attempt()).await {
            return Some(found);
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return None;
        }
        sleep(POLL_INTERVAL.min(remaining)).await;
    }
}

/// 自己启动的浏览器进程
#[async_trait]
trait BrowserProcess: Send {
    /// 通过 CDP 请求浏览器退出
    async fn request_close(&mut self) -> Result<(), BrowserError>;
    async fn force_kill(&mut self) -> std::io::Result<()>;
    async fn wait_exit(&mut self) -> std::io::Result<()>;
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn request_close(&mut self) -> Result<(), BrowserError> {
        self.close().await?;
        Ok(())
    }

    async fn force_kill(&mut self) -> std::io::Result<()> {
        // 没有子进程时返回 None
        self.kill().await.unwrap_or(Ok(()))
    }

    async fn wait_exit(&mut self) -> std::io::Result<()> {
        self.wait().await.map(|_| ())
    }
}

/// 结束浏览器进程
///
/// CDP 通道断开时 `request_close` 会失败，此时直接结束进程；
/// 进程在 [`PROCESS_EXIT_TIMEOUT`] 内仍未退出也会被强制结束。
async fn shut_down(process: &mut dyn BrowserProcess) -> Result<(), BrowserError> {
    let closed = process.request_close().await;
    if let Err(e) = &closed {
        warn!("请求浏览器退出失败，强制结束进程: {}", e);
        if let Err(e) = process.force_kill().await {
            warn!("结束浏览器进程失败: {}", e);
        }
    }

    match timeout(PROCESS_EXIT_TIMEOUT, process.wait_exit()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("等待浏览器进程退出失败: {}", e),
        Err(_) => {
            warn!("浏览器进程 {:?} 内未退出，强制结束", PROCESS_EXIT_TIMEOUT);
            if let Err(e) = process.force_kill().await {
                warn!("结束浏览器进程失败: {}", e);
            }
        }
    }

    closed
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // 没有走 close() 时（例如 panic），Launched 的浏览器进程由 Browser 自己的 Drop 结束
        if !self.closed {
            warn!("浏览器会话未正常关闭，强制释放");
        }
        self.handler.abort();
    }
}

/// Chromium 页面元素
struct ChromiumElement(Element);

#[async_trait]
impl PageElement for ChromiumElement {
    async fn clear(&self) -> Result<(), BrowserError> {
        self.0.call_js_fn(CLEAR_FIELD_JS, false).await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), BrowserError> {
        self.0.focus().await?;
        self.0.type_str(text).await?;
        Ok(())
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.0.click().await?;
        Ok(())
    }
}
