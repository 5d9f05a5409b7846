// ==========================================
// 成绩表导入系统 - 统计报表
// ==========================================
// 职责: 查询种类的封闭枚举 + 分发 + 百分比计算（零人数保护）
// 红线: 仓储层只返回原始计数,百分比只在这里计算
// ==========================================

use crate::repository::{MarkQueries, RepositoryResult};
use std::fmt;

// ==========================================
// QueryKind - 查询种类
// ==========================================
// 每个变体携带自己需要的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    PercentageFailed { subject: String, year: String },
    PercentagePassed { subject: String, year: String },
    TotalEnrolled { subject: String, year: String },
    StudentsInSubject { subject: String, year: String },
    SubjectsInYear { year: String },
}

impl QueryKind {
    pub fn year(&self) -> &str {
        match self {
            QueryKind::PercentageFailed { year, .. }
            | QueryKind::PercentagePassed { year, .. }
            | QueryKind::TotalEnrolled { year, .. }
            | QueryKind::StudentsInSubject { year, .. }
            | QueryKind::SubjectsInYear { year } => year,
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            QueryKind::PercentageFailed { subject, .. }
            | QueryKind::PercentagePassed { subject, .. }
            | QueryKind::TotalEnrolled { subject, .. }
            | QueryKind::StudentsInSubject { subject, .. } => Some(subject),
            QueryKind::SubjectsInYear { .. } => None,
        }
    }
}

// ==========================================
// QueryAnswer - 查询结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAnswer {
    /// 百分比（0-100）
    Percentage(f64),
    /// 该科目-学年组合没有任何选课记录
    NoData,
    Count(i64),
    Names(Vec<String>),
}

impl fmt::Display for QueryAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryAnswer::Percentage(p) => write!(f, "查询结果: {:.2}%", p),
            QueryAnswer::NoData => write!(f, "没有该科目-学年组合的数据"),
            QueryAnswer::Count(n) => write!(f, "查询结果: {}", n),
            QueryAnswer::Names(names) if names.is_empty() => write!(f, "查询结果为空（none）"),
            QueryAnswer::Names(names) => {
                for (idx, name) in names.iter().enumerate() {
                    if idx > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", name)?;
                }
                Ok(())
            }
        }
    }
}

/// 计算百分比; 总数为 0 时返回 NoData
pub fn percentage(part: i64, total: i64) -> QueryAnswer {
    if total <= 0 {
        return QueryAnswer::NoData;
    }
    QueryAnswer::Percentage(part as f64 * 100.0 / total as f64)
}

/// 执行查询
pub fn run_query<Q: MarkQueries + ?Sized>(
    queries: &Q,
    kind: &QueryKind,
) -> RepositoryResult<QueryAnswer> {
    let answer = match kind {
        QueryKind::PercentageFailed { subject, year } => {
            let failed = queries.count_failed(subject, year)?;
            let total = queries.count_enrolled(subject, year)?;
            percentage(failed, total)
        }
        QueryKind::PercentagePassed { subject, year } => {
            let passed = queries.count_passed(subject, year)?;
            let total = queries.count_enrolled(subject, year)?;
            percentage(passed, total)
        }
        QueryKind::TotalEnrolled { subject, year } => {
            QueryAnswer::Count(queries.count_enrolled(subject, year)?)
        }
        QueryKind::StudentsInSubject { subject, year } => {
            QueryAnswer::Names(queries.list_enrolled(subject, year)?)
        }
        QueryKind::SubjectsInYear { year } => QueryAnswer::Names(queries.list_subjects(year)?),
    };
    Ok(answer)
}
