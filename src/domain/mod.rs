// ==========================================
// 成绩表导入系统 - 领域模型层
// ==========================================
// 职责: 定义学生 / 科目 / 成绩关联实体与领域常量
// 红线: 不含数据访问逻辑,不含导入逻辑
// ==========================================

pub mod gradebook;
pub mod types;

// 重导出核心类型
pub use gradebook::{MarkLink, SheetKey, Student, StudentRecord, Subject, PASSING_MARK};
pub use types::{MarkConflictPolicy, StoreOutcome};
