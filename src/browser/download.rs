//! 浏览器下载捕获
//!
//! 通过 CDP 的 `Browser.setDownloadBehavior` 让浏览器把下载文件以 GUID 命名
//! 存到暂存目录，再监听 `Browser.downloadWillBegin` / `Browser.downloadProgress`
//! 事件等待完成，最后把文件移动到目标路径。

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chromiumoxide::cdp::browser_protocol::browser::{
    DownloadProgressState, EventDownloadProgress, EventDownloadWillBegin,
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::Browser;
use futures::{Stream, StreamExt};
use tempfile::TempDir;
use tracing::debug;

use crate::error::DownloadError;

/// 下载监视器
///
/// 暂存目录建在存档目录内部，保证最终的 rename 不跨文件系统；
/// 监视器被丢弃时暂存目录随之删除。
pub struct DownloadWatcher {
    staging_dir: TempDir,
    timeout: Duration,
}

impl DownloadWatcher {
    /// 开启浏览器的下载事件，并把下载重定向到 `archive_dir` 下的暂存目录
    pub async fn enable(browser: &Browser, archive_dir: &Path, timeout: Duration) -> Result<Self> {
        let staging_dir = tempfile::Builder::new()
            .prefix(".downloads-")
            .tempdir_in(archive_dir)?;

        // 浏览器只接受绝对路径
        let download_path = std::fs::canonicalize(staging_dir.path())?;

        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::AllowAndName)
            .download_path(download_path.to_string_lossy().to_string())
            .events_enabled(true)
            .build()
            .map_err(|e| anyhow!("构建下载行为参数失败: {}", e))?;
        browser.execute(params).await?;

        debug!("下载暂存目录: {}", staging_dir.path().display());
        Ok(Self {
            staging_dir,
            timeout,
        })
    }

    /// 执行 `trigger` 触发下载，等待完成后保存到 `dest`
    ///
    /// # 返回
    /// 返回保存的字节数
    pub async fn capture<Fut>(&self, browser: &Browser, trigger: Fut, dest: &Path) -> Result<u64>
    where
        Fut: Future<Output = Result<()>>,
    {
        // 必须在触发之前订阅，否则可能错过事件
        let began = browser.event_listener::<EventDownloadWillBegin>().await?;
        let progress = browser.event_listener::<EventDownloadProgress>().await?;

        trigger.await?;

        let guid = tokio::time::timeout(
            self.timeout,
            wait_for_completion(
                began.map(|event| event.guid.clone()),
                progress.map(|event| (event.guid.clone(), event.state.clone())),
            ),
        )
        .await
        .map_err(|_| DownloadError::Timeout {
            secs: self.timeout.as_secs(),
        })??;

        let staged = self.staged_path(&guid);
        let size = persist(&staged, dest).await?;
        Ok(size)
    }

    fn staged_path(&self, guid: &str) -> PathBuf {
        self.staging_dir.path().join(guid)
    }
}

/// 恢复浏览器默认的下载行为
///
/// `setDownloadBehavior` 作用于整个浏览器。连接到用户自己的浏览器时，
/// 运行结束后必须恢复，否则下载仍会写到已删除的暂存目录。
pub async fn restore_default_behavior(browser: &Browser) -> Result<()> {
    browser.execute(default_behavior_params()?).await?;
    debug!("已恢复浏览器默认下载行为");
    Ok(())
}

fn default_behavior_params() -> Result<SetDownloadBehaviorParams> {
    SetDownloadBehaviorParams::builder()
        .behavior(SetDownloadBehaviorBehavior::Default)
        .events_enabled(false)
        .build()
        .map_err(|e| anyhow!("构建下载行为参数失败: {}", e))
}

/// 等待第一个开始的下载结束，返回其 GUID
async fn wait_for_completion<B, P>(began: B, progress: P) -> Result<String, DownloadError>
where
    B: Stream<Item = String>,
    P: Stream<Item = (String, DownloadProgressState)>,
{
    futures::pin_mut!(began);
    futures::pin_mut!(progress);

    let guid = began.next().await.ok_or(DownloadError::EventStreamClosed)?;
    debug!("下载开始: {}", guid);

    while let Some((event_guid, state)) = progress.next().await {
        if event_guid != guid {
            continue;
        }
        match state {
            DownloadProgressState::Completed => return Ok(guid),
            DownloadProgressState::Canceled => return Err(DownloadError::Canceled { guid }),
            DownloadProgressState::InProgress => {}
        }
    }
    Err(DownloadError::EventStreamClosed)
}

/// 把暂存文件移动到目标路径
async fn persist(staged: &Path, dest: &Path) -> Result<u64, DownloadError> {
    let save_failed = |source| DownloadError::SaveFailed {
        path: dest.to_path_buf(),
        source,
    };
    tokio::fs::rename(staged, dest).await.map_err(save_failed)?;
    let metadata = tokio::fs::metadata(dest).await.map_err(save_failed)?;
    Ok(metadata.len())
}
