//! 公报检索页 - 业务能力层
//!
//! 用 chromiumoxide 驱动 gazzettaufficiale.it 的普通公报检索表单

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::element::Element;
use chromiumoxide::Browser;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::browser::DownloadWatcher;
use crate::error::BrowserError;
use crate::infrastructure::JsExecutor;
use crate::services::listing::ListingSource;

/// 年份下拉框
pub const YEAR_SELECT: &str = "#annoPubblicazione";
/// 检索按钮
pub const SEARCH_BUTTON: &str = r#"input[name="cerca"][value="Cerca"]"#;
/// 检索结果中的单个条目
pub const ENTRY_SELECTOR: &str = ".elemento_mese";
/// 条目标题
pub const TITLE_SELECTOR: &str = ".titolo_atto";
/// 条目的 PDF 下载链接
pub const DOWNLOAD_LINK: &str = "a.download_pdf";

/// 公报检索页
///
/// 职责：
/// - 打开检索页、选择年份、提交检索
/// - 按文档顺序缓存结果条目
/// - 读取标题、触发下载
/// - 不关心文件名和计数
pub struct GazettePage<'b> {
    browser: &'b Browser,
    executor: JsExecutor,
    downloads: DownloadWatcher,
    search_url: String,
    settle_delay: Duration,
    entries: Vec<Element>,
}

impl<'b> GazettePage<'b> {
    pub fn new(
        browser: &'b Browser,
        executor: JsExecutor,
        downloads: DownloadWatcher,
        search_url: impl Into<String>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            browser,
            executor,
            downloads,
            search_url: search_url.into(),
            settle_delay,
            entries: Vec::new(),
        }
    }

    fn entry(&self, index: usize) -> Result<&Element> {
        self.entries.get(index).ok_or_else(|| {
            BrowserError::EntryOutOfRange {
                index,
                total: self.entries.len(),
            }
            .into()
        })
    }
}

impl ListingSource for GazettePage<'_> {
    async fn open_year(&mut self, year: u16) -> Result<usize> {
        let page = self.executor.page();

        info!("正在打开检索页: {}", self.search_url);
        page.goto(self.search_url.as_str())
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: self.search_url.clone(),
                source: e,
            })?;

        info!("选择年份: {}", year);
        let year_value = year.to_string();
        if !self.executor.select_option(YEAR_SELECT, &year_value).await? {
            return Err(BrowserError::OptionNotFound {
                selector: YEAR_SELECT.to_string(),
                value: year_value,
            }
            .into());
        }

        info!("点击检索按钮...");
        let button = page
            .find_element(SEARCH_BUTTON)
            .await
            .map_err(|_| BrowserError::ElementNotFound {
                selector: SEARCH_BUTTON.to_string(),
            })?;
        button.click().await?;
        page.wait_for_navigation()
            .await
            .context("等待检索结果加载失败")?;
        info!("检索结果已加载");

        // 等待页面稳定
        sleep(self.settle_delay).await;

        self.entries = page.find_elements(ENTRY_SELECTOR).await?;
        debug!("找到 {} 个 {} 元素", self.entries.len(), ENTRY_SELECTOR);
        Ok(self.entries.len())
    }

    async fn entry_title(&mut self, index: usize) -> Result<String> {
        let title = self
            .entry(index)?
            .find_element(TITLE_SELECTOR)
            .await
            .map_err(|_| BrowserError::ElementNotFound {
                selector: TITLE_SELECTOR.to_string(),
            })?
            .inner_text()
            .await?
            .unwrap_or_default();
        Ok(title.trim().to_string())
    }

    async fn download_entry(&mut self, index: usize, dest: &Path) -> Result<u64> {
        let link = self
            .entry(index)?
            .find_element(DOWNLOAD_LINK)
            .await
            .map_err(|_| BrowserError::ElementNotFound {
                selector: DOWNLOAD_LINK.to_string(),
            })?;

        let trigger = async {
            link.click().await?;
            Ok::<(), anyhow::Error>(())
        };
        self.downloads.capture(self.browser, trigger, dest).await
    }
}
