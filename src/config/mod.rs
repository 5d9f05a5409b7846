// ==========================================
// 成绩表导入系统 - 配置层
// ==========================================
// 职责: 启动时一次性构造配置,按引用传入仓储构造函数
// 来源: 进程环境变量（可由 .env 预加载）
// ==========================================

pub mod db_config;

// 重导出核心配置
pub use db_config::{config_keys, ConfigError, DbConfig};
