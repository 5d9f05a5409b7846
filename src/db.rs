// ==========================================
// 成绩表导入系统 - SQLite 连接与事务作用域
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键 + busy_timeout）
// - 每个仓储操作独占一个短生命周期连接 + 事务,任何退出路径都释放
// - 建表幂等（CREATE TABLE IF NOT EXISTS）,不做迁移
// ==========================================

use crate::config::DbConfig;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 成绩册 schema
///
/// 说明：
/// - student / subject 的唯一约束与"查找或创建"语义一致
/// - student_subject 以 (student_id, subject_id, mark) 为复合主键
pub const GRADEBOOK_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS student (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    UNIQUE (name, last_name)
);

CREATE TABLE IF NOT EXISTS subject (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    year TEXT NOT NULL,
    UNIQUE (name, year)
);

CREATE TABLE IF NOT EXISTS student_subject (
    student_id INTEGER NOT NULL REFERENCES student(id),
    subject_id INTEGER NOT NULL REFERENCES subject(id),
    mark REAL NOT NULL,
    PRIMARY KEY (student_id, subject_id, mark)
);

CREATE INDEX IF NOT EXISTS idx_student_subject_subject
    ON student_subject(subject_id);
CREATE INDEX IF NOT EXISTS idx_subject_year
    ON subject(year);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(GRADEBOOK_SCHEMA)
}

// ==========================================
// 事务作用域
// ==========================================
// 打开连接 → 开始事务 → 执行 → 成功提交 / 失败回滚 → 释放连接
//
// 回滚由 Transaction 的 Drop 完成（默认 DropBehavior::Rollback）,
// 连接在函数返回时随作用域释放。

/// 在独立连接 + 事务中执行闭包
///
/// # 参数
/// - config: 数据库配置
/// - behavior: 事务类型（写操作使用 Immediate,读操作使用 Deferred）
/// - op: 事务内操作
///
/// # 返回
/// - Ok(T): 闭包返回值（事务已提交）
/// - Err(E): 闭包或数据库错误（事务已回滚）
pub fn with_transaction<T, E, F>(
    config: &DbConfig,
    behavior: TransactionBehavior,
    op: F,
) -> Result<T, E>
where
    F: FnOnce(&Transaction) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    let mut conn = open_sqlite_connection(config.database_path())?;
    let tx = conn.transaction_with_behavior(behavior)?;
    let value = op(&tx)?;
    tx.commit()?;
    Ok(value)
}
