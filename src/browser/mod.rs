pub mod connection;
pub mod download;
pub mod launch;

pub use connection::connect_to_browser_and_page;
pub use download::{restore_default_behavior, DownloadWatcher};
pub use launch::launch_browser;

use anyhow::Result;
use chromiumoxide::{Browser, Page};

use crate::config::Config;

/// 浏览器来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserOrigin {
    /// 由本程序启动，结束时需要关闭
    Launched,
    /// 连接到用户已打开的浏览器，结束时保持打开
    Connected,
}

/// 根据配置连接或启动浏览器
pub async fn start_browser(config: &Config) -> Result<(Browser, Page, BrowserOrigin)> {
    match config.browser_debug_port {
        Some(port) => {
            let (browser, page) = connect_to_browser_and_page(port).await?;
            Ok((browser, page, BrowserOrigin::Connected))
        }
        None => {
            let (browser, page) = launch_browser(config).await?;
            Ok((browser, page, BrowserOrigin::Launched))
        }
    }
}
