//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先读取 `RUST_LOG`；否则 `verbose` 时为 debug，默认 info。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录答题开始信息
///
/// # 参数
/// - `paper_id`: 论文ID
/// - `level_id`: 关卡ID
/// - `pair_count`: 题目组数
pub fn log_session_start(paper_id: &str, level_id: &str, pair_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始答题 - 论文 {} / 关卡 {}", paper_id, level_id);
    info!("📊 共 {} 组题目", pair_count);
    info!("{}", "=".repeat(60));
}

/// 记录题目组开始
pub fn log_pair_start(pair_index: usize, pair_count: usize, stem: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📦 第 {}/{} 组", pair_index + 1, pair_count);
    info!("引入题: {}", truncate_text(stem, 80));
}

/// 记录关卡完成
pub fn log_completion(paper_id: &str, pair_count: usize) {
    info!("\n{}", "=".repeat(60));
    info!("🎉 论文 {} 全部 {} 组题目完成", paper_id, pair_count);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_chars_not_bytes() {
        assert_eq!(truncate_text("自注意力机制", 4), "自注意力...");
        assert_eq!(truncate_text("短", 4), "短");
    }
}
