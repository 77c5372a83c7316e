use anyhow::Result;
use gazette_archiver::utils::logging;
use gazette_archiver::{Config, FetchApp};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load()?;

    // 初始化并运行应用，无论成功与否都关闭浏览器
    let app = FetchApp::initialize(config).await?;
    let result = app.run().await;
    app.shutdown().await?;

    result.map(|_| ())
}
