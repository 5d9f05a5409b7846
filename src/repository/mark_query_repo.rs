// ==========================================
// 成绩表导入系统 - 成绩查询仓储（Query Layer）
// ==========================================
// 职责: 只读统计查询（计数 / 名单 / 科目列表）
// 红线: 不计算百分比,零人数保护由调用方负责
// 排序: 按关联写入顺序（student_subject.rowid）
// ==========================================

use crate::config::DbConfig;
use crate::db::{ensure_schema, open_sqlite_connection, with_transaction};
use crate::domain::{Student, Subject, PASSING_MARK};
use crate::repository::error::RepositoryResult;
use crate::repository::mark_store::MarkQueries;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, TransactionBehavior};

// 分数过滤条件
#[derive(Debug, Clone, Copy)]
enum MarkFilter {
    Passed,
    Failed,
    Any,
}

impl MarkFilter {
    fn sql(self) -> &'static str {
        match self {
            MarkFilter::Passed => "AND ss.mark >= ?3",
            MarkFilter::Failed => "AND ss.mark < ?3",
            MarkFilter::Any => "",
        }
    }

    /// 绑定参数: ?1 = 科目名, ?2 = 学年, ?3 = 及格线（仅分数过滤时）
    fn bind(self, subject: &str, year: &str) -> Vec<Value> {
        let mut values = vec![
            Value::Text(subject.to_string()),
            Value::Text(year.to_string()),
        ];
        match self {
            MarkFilter::Passed | MarkFilter::Failed => values.push(Value::Real(PASSING_MARK)),
            MarkFilter::Any => {}
        }
        values
    }
}

// ==========================================
// MarkQueryRepository
// ==========================================
pub struct MarkQueryRepository {
    config: DbConfig,
}

impl MarkQueryRepository {
    /// 创建新的 Repository 实例（并确保 schema 存在）
    pub fn new(config: &DbConfig) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(config.database_path())?;
        ensure_schema(&conn)?;

        Ok(Self {
            config: config.clone(),
        })
    }

    fn count_links(&self, subject: &str, year: &str, filter: MarkFilter) -> RepositoryResult<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM student_subject ss
            JOIN subject s ON s.id = ss.subject_id
            WHERE s.name = ?1 AND s.year = ?2 {}
            "#,
            filter.sql()
        );

        let values = filter.bind(subject, year);

        with_transaction(
            &self.config,
            TransactionBehavior::Deferred,
            |tx| -> RepositoryResult<i64> {
                let count: i64 =
                    tx.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
                Ok(count)
            },
        )
    }

    fn list_links(
        &self,
        subject: &str,
        year: &str,
        filter: MarkFilter,
    ) -> RepositoryResult<Vec<String>> {
        let sql = format!(
            r#"
            SELECT st.id, st.name, st.last_name
            FROM student_subject ss
            JOIN subject s ON s.id = ss.subject_id
            JOIN student st ON st.id = ss.student_id
            WHERE s.name = ?1 AND s.year = ?2 {}
            ORDER BY ss.rowid
            "#,
            filter.sql()
        );

        let values = filter.bind(subject, year);

        with_transaction(
            &self.config,
            TransactionBehavior::Deferred,
            |tx| -> RepositoryResult<Vec<String>> {
                let mut stmt = tx.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                    Ok(Student {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        last_name: row.get(2)?,
                    })
                })?;

                let mut names = Vec::new();
                for row in rows {
                    names.push(row?.full_name());
                }
                Ok(names)
            },
        )
    }
}

impl MarkQueries for MarkQueryRepository {
    fn count_passed(&self, subject: &str, year: &str) -> RepositoryResult<i64> {
        self.count_links(subject, year, MarkFilter::Passed)
    }

    fn count_failed(&self, subject: &str, year: &str) -> RepositoryResult<i64> {
        self.count_links(subject, year, MarkFilter::Failed)
    }

    fn count_enrolled(&self, subject: &str, year: &str) -> RepositoryResult<i64> {
        self.count_links(subject, year, MarkFilter::Any)
    }

    fn list_passed(&self, subject: &str, year: &str) -> RepositoryResult<Vec<String>> {
        self.list_links(subject, year, MarkFilter::Passed)
    }

    fn list_failed(&self, subject: &str, year: &str) -> RepositoryResult<Vec<String>> {
        self.list_links(subject, year, MarkFilter::Failed)
    }

    fn list_enrolled(&self, subject: &str, year: &str) -> RepositoryResult<Vec<String>> {
        self.list_links(subject, year, MarkFilter::Any)
    }

    fn list_subjects(&self, year: &str) -> RepositoryResult<Vec<String>> {
        with_transaction(
            &self.config,
            TransactionBehavior::Deferred,
            |tx| -> RepositoryResult<Vec<String>> {
                let mut stmt =
                    tx.prepare("SELECT id, name, year FROM subject WHERE year = ?1 ORDER BY id")?;
                let rows = stmt.query_map(params![year], |row| {
                    Ok(Subject {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        year: row.get(2)?,
                    })
                })?;

                let mut subjects = Vec::new();
                for row in rows {
                    subjects.push(row?.name);
                }
                Ok(subjects)
            },
        )
    }
}
