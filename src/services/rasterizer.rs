//! PDF 栅格化能力 - 业务能力层

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::error::RecognitionError;
use crate::services::external_tool::run_tool;

/// 把 PDF 第一页渲染成图像
#[allow(async_fn_in_trait)]
pub trait Rasterizer {
    /// 渲染 `pdf` 的第一页，图像写入 `work_dir`，返回图像路径
    async fn first_page(&self, pdf: &Path, work_dir: &Path) -> Result<PathBuf>;
}

/// 默认渲染分辨率（DPI），与 pdf2image 的默认值一致
pub const DEFAULT_RASTER_DPI: u32 = 200;

/// poppler-utils 的 `pdftoppm`
///
/// 只渲染第 1 页。
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    program: String,
    dpi: u32,
}

impl Pdftoppm {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            dpi: DEFAULT_RASTER_DPI,
        }
    }

    /// 设置渲染分辨率
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

impl Default for Pdftoppm {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Rasterizer for Pdftoppm {
    async fn first_page(&self, pdf: &Path, work_dir: &Path) -> Result<PathBuf> {
        let prefix = work_dir.join("page");
        let dpi = self.dpi.to_string();
        run_tool(
            &self.program,
            [
                OsStr::new("-png"),
                OsStr::new("-r"),
                OsStr::new(&dpi),
                OsStr::new("-f"),
                OsStr::new("1"),
                OsStr::new("-l"),
                OsStr::new("1"),
                OsStr::new("-singlefile"),
                pdf.as_os_str(),
                prefix.as_os_str(),
            ],
        )
        .await?;

        // -singlefile 时输出文件不带页码后缀
        let image = prefix.with_extension("png");
        if !image.exists() {
            return Err(RecognitionError::NoPageImage {
                pdf: pdf.to_path_buf(),
            }
            .into());
        }
        debug!("第一页图像: {}", image.display());
        Ok(image)
    }
}
