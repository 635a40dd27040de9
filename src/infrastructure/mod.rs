//! 基础设施层：持有稀缺资源（浏览器会话），只暴露能力

pub mod chromium_session;
pub mod locator;
pub mod session;

pub use chromium_session::ChromiumSession;
pub use locator::{Locator, Query};
pub use session::{BrowserSession, PageElement, SessionFactory, WaitCondition};
