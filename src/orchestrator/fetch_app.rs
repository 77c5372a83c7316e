//! 下载应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建存档目录、连接或启动浏览器
//! 2. **资源管理**：唯一持有 Browser 的模块，负责最后关闭
//! 3. **向下委托**：组装 GazettePage，交给 `year_fetcher` 逐条处理

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::browser::{self, BrowserOrigin, DownloadWatcher};
use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::orchestrator::year_fetcher::{fetch_year, FetchSummary};
use crate::services::{ArchiveStore, GazettePage};
use crate::utils::logging::{log_banner, now};

/// 应用主结构
pub struct FetchApp {
    config: Config,
    store: ArchiveStore,
    browser: Browser,
    page: Page,
    origin: BrowserOrigin,
}

impl FetchApp {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let store = ArchiveStore::new(&config.archive_dir);
        store.ensure_exists().await?;

        let (browser, page, origin) = browser::start_browser(&config).await?;

        Ok(Self {
            config,
            store,
            browser,
            page,
            origin,
        })
    }

    /// 运行下载
    pub async fn run(&self) -> Result<FetchSummary> {
        let downloads = DownloadWatcher::enable(
            &self.browser,
            self.store.root(),
            self.config.download_timeout(),
        )
        .await?;

        let mut listing = GazettePage::new(
            &self.browser,
            JsExecutor::new(self.page.clone()),
            downloads,
            self.config.search_url.clone(),
            self.config.settle_delay(),
        );

        fetch_year(
            &mut listing,
            &self.store,
            self.config.year,
            self.config.download_delay(),
        )
        .await
    }

    /// 结束运行，关闭自行启动的浏览器
    pub async fn shutdown(mut self) -> Result<()> {
        if self.config.hold_browser_open {
            info!("按回车键关闭浏览器...");
            let mut line = String::new();
            BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        }

        match self.origin {
            BrowserOrigin::Launched => {
                if let Err(e) = self.browser.close().await {
                    warn!("关闭浏览器失败: {}", e);
                }
                let _ = self.browser.wait().await;
                info!("浏览器已关闭");
            }
            BrowserOrigin::Connected => {
                // 下载行为是浏览器级别的设置，暂存目录已随下载监视器删除
                if let Err(e) = browser::restore_default_behavior(&self.browser).await {
                    warn!("恢复浏览器下载行为失败: {:#}", e);
                }
                if let Err(e) = self.page.close().await {
                    warn!("关闭页面失败: {}", e);
                }
                info!("已断开与浏览器的连接");
            }
        }
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    log_banner("🚀 公报下载程序启动");
    info!("启动时间: {}", now());
    info!("📅 年份: {}", config.year);
    info!("📁 存档目录: {}", config.archive_dir.display());
    match config.browser_debug_port {
        Some(port) => info!("🌐 连接浏览器调试端口: {}", port),
        None => info!("🌐 自行启动浏览器"),
    }
}
