//! 浏览器会话能力
//!
//! 执行器只通过这里的 trait 操作浏览器。每个会话由一个提示独占，
//! 用完即关闭，不在提示之间共享。

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::infrastructure::locator::Locator;

/// 等待元素的条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// 元素出现在 DOM 中
    Present,
    /// 元素可见且未被禁用
    Clickable,
}

/// 页面上的一个元素
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn clear(&self) -> Result<(), BrowserError>;
    async fn send_keys(&self, text: &str) -> Result<(), BrowserError>;
    async fn click(&self) -> Result<(), BrowserError>;
}

/// 单次使用的浏览器会话
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// 在超时时间内等待元素满足条件
    async fn wait_for_element(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Box<dyn PageElement>, BrowserError>;

    async fn go_back(&mut self) -> Result<(), BrowserError>;

    async fn title(&mut self) -> Result<String, BrowserError>;

    /// 释放会话占用的资源
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// 会话工厂，每次调用创建一个全新的会话
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}
