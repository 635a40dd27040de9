//! 浏览器启动与连接
//!
//! [`ChromiumLauncher`] 为每个提示创建一个全新的 [`ChromiumSession`]：
//! - 默认启动独立的浏览器进程，会话关闭时进程随之结束
//! - 配置了调试端口时连接已有浏览器，只新开一个页面，会话关闭时关掉该页面

mod connection;
mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_browser;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::BrowserError;
use crate::infrastructure::chromium_session::{ChromiumSession, Ownership};
use crate::infrastructure::session::{BrowserSession, SessionFactory};

/// Chromium 会话工厂
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    headless: bool,
    chrome_executable: Option<String>,
    debug_port: Option<u16>,
}

impl ChromiumLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
            debug_port: config.browser_debug_port,
        }
    }
}

#[async_trait]
impl SessionFactory for ChromiumLauncher {
    async fn create(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let (ownership, handler) = match self.debug_port {
            Some(port) => {
                let (browser, handler) = connect_to_browser(port).await?;
                (Ownership::Attached(browser), handler)
            }
            None => {
                let (browser, handler) =
                    launch_browser(self.headless, self.chrome_executable.as_deref()).await?;
                (Ownership::Launched(browser), handler)
            }
        };

        let browser = match &ownership {
            Ownership::Launched(b) | Ownership::Attached(b) => b,
        };

        debug!("创建空白页面");
        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                error!("创建空白页面失败: {}", e);
                handler.abort();
                return Err(BrowserError::session_setup_failed(e));
            }
        };

        Ok(Box::new(ChromiumSession::new(ownership, page, handler)))
    }
}
