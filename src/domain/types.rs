// ==========================================
// 成绩表导入系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 成绩冲突策略 (Mark Conflict Policy)
// ==========================================
// 同一学生+科目再次出现且分数不同时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkConflictPolicy {
    /// 按 (学生, 科目, 分数) 判重,不同分数视为新关联
    #[default]
    KeepDistinctMarks,
    /// 每个 (学生, 科目) 至多保留一个分数,新分数覆盖旧分数
    ReplaceMark,
}

impl fmt::Display for MarkConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkConflictPolicy::KeepDistinctMarks => write!(f, "keep-distinct"),
            MarkConflictPolicy::ReplaceMark => write!(f, "replace"),
        }
    }
}

impl FromStr for MarkConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep-distinct" | "keep_distinct" => Ok(MarkConflictPolicy::KeepDistinctMarks),
            "replace" => Ok(MarkConflictPolicy::ReplaceMark),
            other => Err(format!("未知的成绩冲突策略: {}", other)),
        }
    }
}

// ==========================================
// 写入结果 (Store Outcome)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreOutcome {
    Inserted,       // 新增关联
    AlreadyPresent, // 完全相同的关联已存在,静默跳过
    Replaced,       // ReplaceMark 策略下覆盖了旧分数
}

impl fmt::Display for StoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOutcome::Inserted => write!(f, "INSERTED"),
            StoreOutcome::AlreadyPresent => write!(f, "ALREADY_PRESENT"),
            StoreOutcome::Replaced => write!(f, "REPLACED"),
        }
    }
}
