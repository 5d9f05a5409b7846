// ==========================================
// 成绩表导入系统 - 数据库连接配置
// ==========================================
// 必填: DB_NAME / DB_USER / DB_PASS / DB_HOST / DB_PORT（无默认值）
// 可选: MARK_CONFLICT_POLICY（默认 keep-distinct）
// ==========================================

use crate::domain::types::MarkConflictPolicy;
use std::fmt;
use thiserror::Error;

pub mod config_keys {
    pub const DB_NAME: &str = "DB_NAME";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASS: &str = "DB_PASS";
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_PORT: &str = "DB_PORT";

    // 成绩冲突策略
    pub const MARK_CONFLICT_POLICY: &str = "MARK_CONFLICT_POLICY";
}

/// 配置错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("缺少必填配置项: {0}")]
    Missing(&'static str),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

// ==========================================
// DbConfig - 数据库连接配置
// ==========================================
// DB_NAME 为 SQLite 数据库文件路径;
// 其余字段保留用于连接描述与日志
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub db_name: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_host: String,
    pub db_port: u16,
    pub conflict_policy: MarkConflictPolicy,
}

impl DbConfig {
    /// 从进程环境变量构造配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值查找函数构造配置
    ///
    /// 空字符串（去除首尾空白后）视为缺失
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let db_name = required(config_keys::DB_NAME)?;
        let db_user = required(config_keys::DB_USER)?;
        let db_pass = required(config_keys::DB_PASS)?;
        let db_host = required(config_keys::DB_HOST)?;
        let raw_port = required(config_keys::DB_PORT)?;

        // 每次操作都会重新打开连接,内存库无法跨操作保留数据
        if db_name == ":memory:" {
            return Err(ConfigError::Invalid {
                key: config_keys::DB_NAME,
                value: db_name,
                message: "不支持内存数据库,请指定数据库文件路径".to_string(),
            });
        }

        let db_port = raw_port.parse::<u16>().map_err(|e| ConfigError::Invalid {
            key: config_keys::DB_PORT,
            value: raw_port.clone(),
            message: e.to_string(),
        })?;

        let conflict_policy = match lookup(config_keys::MARK_CONFLICT_POLICY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            Some(raw) => raw.parse::<MarkConflictPolicy>().map_err(|message| ConfigError::Invalid {
                key: config_keys::MARK_CONFLICT_POLICY,
                value: raw.clone(),
                message,
            })?,
            None => MarkConflictPolicy::default(),
        };

        Ok(Self {
            db_name,
            db_user,
            db_pass,
            db_host,
            db_port,
            conflict_policy,
        })
    }

    /// SQLite 数据库文件路径
    pub fn database_path(&self) -> &str {
        &self.db_name
    }

    /// 日志用连接描述（不含密码）: user@host:port/name
    pub fn describe(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.db_user, self.db_host, self.db_port, self.db_name
        )
    }
}

// 密码不进入日志
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_pass", &"***")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("conflict_policy", &self.conflict_policy)
            .finish()
    }
}
