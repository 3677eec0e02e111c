use anyhow::{Context, Result};
use paperplay_quiz::utils::logging;
use paperplay_quiz::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let paper_id = std::env::args()
        .nth(1)
        .context("用法: paperplay-quiz <论文ID>")?;

    // 初始化并运行应用
    App::initialize(config)?.run(&paper_id).await?;

    Ok(())
}
