// ==========================================
// 成绩表导入系统 - 成绩册领域模型
// ==========================================
// 实体: student / subject / student_subject
// 生命周期: 仅在导入时创建,不更新、不删除（ReplaceMark 策略除外）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 及格线（固定领域常量,不可配置）
///
/// mark >= 5.0 为及格, mark < 5.0 为不及格
pub const PASSING_MARK: f64 = 5.0;

/// 判断分数是否及格
pub fn is_passing(mark: f64) -> bool {
    mark >= PASSING_MARK
}

// ==========================================
// Student - 学生
// ==========================================
// 唯一性: (name, last_name)
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub last_name: String,
}

impl Student {
    /// 展示用全名: "Name LastName"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

// ==========================================
// Subject - 科目
// ==========================================
// 唯一性: (name, year)
// year 为学年标签,自由格式（如 "2019-2020"）
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub year: String,
}

// ==========================================
// MarkLink - 学生-科目-成绩关联
// ==========================================
// 唯一性: (student_id, subject_id, mark)
#[derive(Debug, Clone, PartialEq)]
pub struct MarkLink {
    pub student_id: i64,
    pub subject_id: i64,
    pub mark: f64,
}

impl MarkLink {
    pub fn new(student_id: i64, subject_id: i64, mark: f64) -> Self {
        Self {
            student_id,
            subject_id,
            mark,
        }
    }

    pub fn is_passed(&self) -> bool {
        is_passing(self.mark)
    }
}

// ==========================================
// SheetKey - 工作表名解析结果
// ==========================================
// "Lit 3 2019-2020" => subject = "Lit 3", year = "2019-2020"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetKey {
    pub subject: String,
    pub year: String,
}

impl fmt::Display for SheetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.subject, self.year)
    }
}

// ==========================================
// StudentRecord - 工作表中的一行数据
// ==========================================
// 固定三列: Name | Last name | Mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub row_number: usize, // 工作表内行号（0 为表头）
    pub name: String,
    pub last_name: String,
    pub mark: f64,
}
