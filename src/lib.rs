// ==========================================
// 成绩表导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine
// 数据流: Excel 成绩册 → 导入编排 → Upsert → SQLite ← 统计查询
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与常量
pub mod domain;

// 导入层 - Excel 成绩册
pub mod importer;

// 数据仓储层 - 写入与查询
pub mod repository;

// 配置层 - 数据库连接配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/事务作用域）
pub mod db;

// 日志系统
pub mod logging;

// 应用层 - 交互式查询
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigError, DbConfig};
pub use domain::{
    MarkConflictPolicy, MarkLink, SheetKey, StoreOutcome, Student, StudentRecord, Subject,
    PASSING_MARK,
};
pub use importer::{GradebookImporter, ImportError, ImportResult, ImportSummary};
pub use repository::{
    MarkQueries, MarkQueryRepository, MarkStore, MarkUpsertRepository, RepositoryError,
    RepositoryResult,
};

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "成绩表导入系统";
