// ==========================================
// 成绩表导入系统 - 日志初始化
// ==========================================
// RUST_LOG: 过滤器（默认 info）,例如 RUST_LOG=gradebook_ingest=debug
// LOG_FORMAT: text（默认）| json
// 一律写 stderr,stdout 留给交互式菜单
// ==========================================

use std::str::FromStr;
use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量名
pub const LOG_FORMAT_KEY: &str = "LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// 每条事件一行 JSON,便于批量导入时采集
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("未知的日志格式: {}", other)),
        }
    }
}

impl LogFormat {
    /// 从 LOG_FORMAT 读取; 未设置或无法识别时回退为 Text
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_KEY)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

/// 初始化日志系统（格式取自 LOG_FORMAT）
///
/// ```no_run
/// gradebook_ingest::logging::init();
/// ```
pub fn init() {
    init_with(LogFormat::from_env());
}

/// 按指定格式初始化日志系统
pub fn init_with(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

/// 测试用: debug 级别,输出交给测试框架捕获,可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
