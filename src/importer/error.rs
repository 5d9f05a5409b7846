// ==========================================
// 成绩表导入系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 语义: 所有错误均为致命错误,终止本次导入（不重试）
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件 {0} 不是 Excel 文件（仅支持 .xlsx/.xls）")]
    NotASpreadsheet(String),

    #[error("Excel 文件无法读取: {0}")]
    UnreadableFile(String),

    // ===== 工作表结构错误 =====
    #[error("工作表名 '{0}' 不正确,应为 'subject course year'")]
    InvalidSheetName(String),

    #[error("工作表 '{sheet}' 的列顺序不正确,应为 Name-Last name-Mark")]
    InvalidColumnOrder { sheet: String },

    // ===== 行数据错误 =====
    #[error("工作表 '{sheet}' 第 {row} 行应包含 3 个单元格,实际 {cells} 个")]
    RowShape {
        sheet: String,
        row: usize,
        cells: usize,
    },

    #[error("工作表 '{sheet}' 第 {row} 行, 列 '{column}': {message}")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: String,
        message: String,
    },

    // ===== 数据库错误 =====
    #[error("成绩落库失败: {0}")]
    Store(#[from] RepositoryError),
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::UnreadableFile(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
