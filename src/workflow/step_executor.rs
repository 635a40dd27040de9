//! 步骤执行器 - 流程层
//!
//! 在一个全新的浏览器会话中按顺序执行 [`ActionSequence`]，每个动作产生一条 [`StepOutcome`]。
//!
//! 单个动作的失败（元素找不到、驱动报错、甚至 panic）只会变成该步骤的 FAIL，
//! 后续动作照常执行。只有会话本身创建失败时才返回错误。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::BrowserError;
use crate::infrastructure::{BrowserSession, Locator, SessionFactory, WaitCondition};
use crate::models::{Action, ActionKind, ActionSequence, StepOutcome, StepStatus};

/// 步骤执行时序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    /// 等待元素出现/可点击的最长时间
    pub element_timeout: Duration,
    /// OPEN_URL 之后等待页面渲染
    pub open_url_settle: Duration,
    /// CLICK 之后等待页面响应
    pub click_settle: Duration,
    /// GO_BACK 之后等待页面渲染
    pub go_back_settle: Duration,
}

impl StepTiming {
    pub fn from_config(config: &Config) -> Self {
        Self {
            element_timeout: config.element_timeout(),
            open_url_settle: config.open_url_settle(),
            click_settle: config.click_settle(),
            go_back_settle: config.go_back_settle(),
        }
    }
}

impl Default for StepTiming {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 步骤执行器
#[derive(Clone)]
pub struct StepExecutor {
    factory: Arc<dyn SessionFactory>,
    timing: StepTiming,
}

impl StepExecutor {
    pub fn new(factory: Arc<dyn SessionFactory>, timing: StepTiming) -> Self {
        Self { factory, timing }
    }

    /// 执行动作序列
    ///
    /// 会话在任何情况下都会被关闭。
    pub async fn execute(&self, actions: &ActionSequence) -> Result<Vec<StepOutcome>, BrowserError> {
        let mut session = self.factory.create().await.map_err(|e| {
            error!("创建浏览器会话失败: {}", e);
            e
        })?;
        debug!("浏览器会话已创建，共 {} 个动作", actions.len());

        let mut outcomes = Vec::with_capacity(actions.len());
        for (idx, action) in actions.iter().enumerate() {
            let index = idx + 1;
            let step = AssertUnwindSafe(self.run_step(session.as_mut(), index, action)).catch_unwind();
            let outcome = match step.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => StepOutcome::fail(index, format!("执行出错: {}", e)),
                Err(panic) => StepOutcome::fail(index, format!("执行出错: {}", panic_message(&*panic))),
            };
            log_outcome(&outcome);
            outcomes.push(outcome);
        }

        if let Err(e) = session.close().await {
            warn!("关闭浏览器会话失败: {}", e);
        }

        Ok(outcomes)
    }

    async fn run_step(
        &self,
        session: &mut dyn BrowserSession,
        index: usize,
        action: &Action,
    ) -> Result<StepOutcome, BrowserError> {
        let value = &action.selector_value;
        let payload = &action.payload;

        match &action.kind {
            ActionKind::OpenUrl => {
                session.navigate(payload).await?;
                sleep(self.timing.open_url_settle).await;
                Ok(StepOutcome::ok(index, format!("已打开 URL: {}", payload)))
            }
            ActionKind::SendKeys => {
                let Some(locator) = Locator::for_send_keys(&action.selector_kind, value) else {
                    return Ok(StepOutcome::warn(
                        index,
                        format!("SEND_KEYS 不支持的选择器类型 '{}'", action.selector_kind),
                    ));
                };
                let element = session
                    .wait_for_element(&locator, WaitCondition::Present, self.timing.element_timeout)
                    .await?;
                element.clear().await?;
                element.send_keys(payload).await?;
                Ok(StepOutcome::ok(index, format!("已向 '{}' 输入文本", value)))
            }
            ActionKind::Click => {
                let Some(locator) = Locator::for_click(&action.selector_kind, value) else {
                    return Ok(StepOutcome::warn(
                        index,
                        format!("CLICK 不支持的选择器类型 '{}'", action.selector_kind),
                    ));
                };
                let element = session
                    .wait_for_element(&locator, WaitCondition::Clickable, self.timing.element_timeout)
                    .await?;
                element.click().await?;
                sleep(self.timing.click_settle).await;
                Ok(StepOutcome::ok(index, format!("已点击 '{}'", value)))
            }
            ActionKind::Wait => match parse_wait(payload) {
                Some(duration) => {
                    sleep(duration).await;
                    Ok(StepOutcome::ok(index, format!("已等待 {} 秒", duration.as_secs_f64())))
                }
                None => Ok(StepOutcome::warn(index, format!("无效的等待时间 '{}'", payload))),
            },
            ActionKind::GoBack => {
                session.go_back().await?;
                sleep(self.timing.go_back_settle).await;
                Ok(StepOutcome::ok(index, "浏览器已后退"))
            }
            ActionKind::VerifyTitle => {
                let title = session.title().await?;
                if title.to_lowercase().contains(&payload.to_lowercase()) {
                    Ok(StepOutcome::ok(index, format!("标题校验通过: '{}'", title)))
                } else {
                    Ok(StepOutcome::fail(
                        index,
                        format!("标题校验失败，期望包含 '{}'，实际为 '{}'", payload, title),
                    ))
                }
            }
            ActionKind::Unknown(raw) => Ok(StepOutcome::warn(index, format!("未知动作 '{}'", raw))),
        }
    }
}

/// 等待秒数必须是非负数，且能表示为 [`Duration`]
fn parse_wait(payload: &str) -> Option<Duration> {
    let seconds = payload.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "未知 panic".to_string()
    }
}

fn log_outcome(outcome: &StepOutcome) {
    match outcome.status {
        StepStatus::Ok => info!("{}", outcome),
        StepStatus::Warn => warn!("{}", outcome),
        StepStatus::Fail => error!("{}", outcome),
    }
}
