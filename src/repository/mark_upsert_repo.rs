// ==========================================
// 成绩表导入系统 - 成绩写入仓储（Upsert Engine）
// ==========================================
// 流程（单事务）:
// 1) 查找或创建 student (name, last_name)
// 2) 查找或创建 subject (name, year)
// 3) 关联 (student, subject, mark) 已存在 → 跳过; 否则插入
//
// 说明:
// - 写事务使用 IMMEDIATE,多进程并发导入时串行化"查找或创建"
// - ReplaceMark 策略下,同一 (student, subject) 的其他分数在同一事务内删除
// ==========================================

use crate::config::DbConfig;
use crate::db::{ensure_schema, open_sqlite_connection, with_transaction};
use crate::domain::{MarkConflictPolicy, MarkLink, StoreOutcome};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::mark_store::MarkStore;
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, instrument};

// ==========================================
// MarkUpsertRepository
// ==========================================
pub struct MarkUpsertRepository {
    config: DbConfig,
}

impl MarkUpsertRepository {
    /// 创建新的 Repository 实例（并确保 schema 存在）
    ///
    /// # 参数
    /// - config: 启动时构造的数据库配置
    pub fn new(config: &DbConfig) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(config.database_path())?;
        ensure_schema(&conn)?;

        Ok(Self {
            config: config.clone(),
        })
    }

    /// 在事务中查找或创建学生,返回 student.id
    fn get_or_create_student_tx(
        tx: &Transaction,
        name: &str,
        last_name: &str,
    ) -> RepositoryResult<i64> {
        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM student WHERE name = ?1 AND last_name = ?2 ORDER BY id LIMIT 1",
                params![name, last_name],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        tx.execute(
            "INSERT INTO student (name, last_name) VALUES (?1, ?2)",
            params![name, last_name],
        )?;
        let id = tx.last_insert_rowid();
        debug!(student_id = id, name, last_name, "新建学生");
        Ok(id)
    }

    /// 在事务中查找或创建科目,返回 subject.id
    fn get_or_create_subject_tx(
        tx: &Transaction,
        subject: &str,
        year: &str,
    ) -> RepositoryResult<i64> {
        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM subject WHERE name = ?1 AND year = ?2 ORDER BY id LIMIT 1",
                params![subject, year],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        tx.execute(
            "INSERT INTO subject (name, year) VALUES (?1, ?2)",
            params![subject, year],
        )?;
        let id = tx.last_insert_rowid();
        debug!(subject_id = id, subject, year, "新建科目");
        Ok(id)
    }

    /// 在事务中检查关联是否已存在
    fn link_exists_tx(tx: &Transaction, link: &MarkLink) -> RepositoryResult<bool> {
        let found: Option<i64> = tx
            .query_row(
                r#"
                SELECT 1 FROM student_subject
                WHERE student_id = ?1 AND subject_id = ?2 AND mark = ?3
                LIMIT 1
                "#,
                params![link.student_id, link.subject_id, link.mark],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// 在事务中删除同一 (student, subject) 下分数不同的关联
    fn delete_other_marks_tx(tx: &Transaction, link: &MarkLink) -> RepositoryResult<usize> {
        let deleted = tx.execute(
            "DELETE FROM student_subject WHERE student_id = ?1 AND subject_id = ?2 AND mark <> ?3",
            params![link.student_id, link.subject_id, link.mark],
        )?;
        Ok(deleted)
    }

    fn insert_link_tx(tx: &Transaction, link: &MarkLink) -> RepositoryResult<()> {
        tx.execute(
            "INSERT INTO student_subject (student_id, subject_id, mark) VALUES (?1, ?2, ?3)",
            params![link.student_id, link.subject_id, link.mark],
        )?;
        debug!(
            student_id = link.student_id,
            subject_id = link.subject_id,
            mark = link.mark,
            passed = link.is_passed(),
            "新建成绩关联"
        );
        Ok(())
    }
}

impl MarkStore for MarkUpsertRepository {
    #[instrument(skip(self), level = "debug")]
    fn store_mark(
        &self,
        name: &str,
        last_name: &str,
        subject: &str,
        year: &str,
        mark: f64,
    ) -> RepositoryResult<StoreOutcome> {
        if !mark.is_finite() {
            return Err(RepositoryError::FieldValueError {
                field: "mark".to_string(),
                message: format!("分数不是有限数值: {}", mark),
            });
        }

        let policy = self.config.conflict_policy;

        let outcome = with_transaction(
            &self.config,
            TransactionBehavior::Immediate,
            |tx| -> RepositoryResult<StoreOutcome> {
                let student_id = Self::get_or_create_student_tx(tx, name, last_name)?;
                let subject_id = Self::get_or_create_subject_tx(tx, subject, year)?;
                let link = MarkLink::new(student_id, subject_id, mark);

                let replaced = match policy {
                    MarkConflictPolicy::KeepDistinctMarks => 0,
                    MarkConflictPolicy::ReplaceMark => Self::delete_other_marks_tx(tx, &link)?,
                };

                let exists = Self::link_exists_tx(tx, &link)?;
                if !exists {
                    Self::insert_link_tx(tx, &link)?;
                }

                if replaced > 0 {
                    Ok(StoreOutcome::Replaced)
                } else if exists {
                    Ok(StoreOutcome::AlreadyPresent)
                } else {
                    Ok(StoreOutcome::Inserted)
                }
            },
        )?;

        debug!(%outcome, "成绩写入完成");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(policy: MarkConflictPolicy) -> (TempDir, DbConfig, MarkUpsertRepository) {
        let dir = TempDir::new().unwrap();
        let config = DbConfig {
            db_name: dir.path().join("marks.sqlite3").to_string_lossy().to_string(),
            db_user: "test".to_string(),
            db_pass: "test".to_string(),
            db_host: "localhost".to_string(),
            db_port: 5432,
            conflict_policy: policy,
        };
        let repo = MarkUpsertRepository::new(&config).unwrap();
        (dir, config, repo)
    }

    fn count(config: &DbConfig, table: &str) -> i64 {
        let conn = open_sqlite_connection(config.database_path()).unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_store_mark_creates_all_three_rows() {
        let (_dir, config, repo) = setup(MarkConflictPolicy::KeepDistinctMarks);

        let outcome = repo
            .store_mark("Tov", "Rod", "Math 3", "2019-2020", 9.9)
            .unwrap();

        assert_eq!(outcome, StoreOutcome::Inserted);
        assert_eq!(count(&config, "student"), 1);
        assert_eq!(count(&config, "subject"), 1);
        assert_eq!(count(&config, "student_subject"), 1);
    }

    #[test]
    fn test_identical_mark_is_silent_noop() {
        let (_dir, config, repo) = setup(MarkConflictPolicy::KeepDistinctMarks);

        repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", 2.0)
            .unwrap();
        let second = repo
            .store_mark("Isa", "Garvi", "Math 3", "2019-2020", 2.0)
            .unwrap();

        assert_eq!(second, StoreOutcome::AlreadyPresent);
        assert_eq!(count(&config, "student_subject"), 1);
    }

    #[test]
    fn test_different_mark_creates_second_link() {
        let (_dir, config, repo) = setup(MarkConflictPolicy::KeepDistinctMarks);

        repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", 2.0)
            .unwrap();
        repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", 6.5)
            .unwrap();

        assert_eq!(count(&config, "student"), 1);
        assert_eq!(count(&config, "subject"), 1);
        assert_eq!(count(&config, "student_subject"), 2);
    }

    #[test]
    fn test_student_and_subject_reused_across_links() {
        let (_dir, config, repo) = setup(MarkConflictPolicy::KeepDistinctMarks);

        repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", 2.0)
            .unwrap();
        repo.store_mark("Isa", "Garvi", "Literature 3", "2019-2020", 3.9)
            .unwrap();
        repo.store_mark("Mar", "Sousa", "Math 3", "2019-2020", 8.9)
            .unwrap();
        // 同名科目不同学年视为不同科目
        repo.store_mark("Isa", "Garvi", "Math 3", "2020-2021", 7.0)
            .unwrap();

        assert_eq!(count(&config, "student"), 2);
        assert_eq!(count(&config, "subject"), 3);
        assert_eq!(count(&config, "student_subject"), 4);
    }

    #[test]
    fn test_replace_policy_keeps_single_mark() {
        let (_dir, config, repo) = setup(MarkConflictPolicy::ReplaceMark);

        assert_eq!(
            repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", 2.0)
                .unwrap(),
            StoreOutcome::Inserted
        );
        assert_eq!(
            repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", 6.5)
                .unwrap(),
            StoreOutcome::Replaced
        );
        assert_eq!(
            repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", 6.5)
                .unwrap(),
            StoreOutcome::AlreadyPresent
        );

        let conn = open_sqlite_connection(config.database_path()).unwrap();
        let mark: f64 = conn
            .query_row("SELECT mark FROM student_subject", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mark, 6.5);
        assert_eq!(count(&config, "student_subject"), 1);
    }

    #[test]
    fn test_failed_link_insert_rolls_back_student_and_subject() {
        let (_dir, config, repo) = setup(MarkConflictPolicy::KeepDistinctMarks);

        let conn = open_sqlite_connection(config.database_path()).unwrap();
        conn.execute_batch(
            r#"
            CREATE TRIGGER block_link_insert BEFORE INSERT ON student_subject
            BEGIN
                SELECT RAISE(ABORT, 'link insert blocked');
            END;
            "#,
        )
        .unwrap();
        drop(conn);

        let result = repo.store_mark("Tov", "Rod", "Math 3", "2019-2020", 9.9);

        assert!(result.is_err());
        assert_eq!(count(&config, "student"), 0);
        assert_eq!(count(&config, "subject"), 0);
        assert_eq!(count(&config, "student_subject"), 0);
    }

    #[test]
    fn test_non_finite_mark_rejected_without_mutation() {
        let (_dir, config, repo) = setup(MarkConflictPolicy::KeepDistinctMarks);

        let result = repo.store_mark("Isa", "Garvi", "Math 3", "2019-2020", f64::NAN);

        assert!(matches!(result, Err(RepositoryError::FieldValueError { .. })));
        assert_eq!(count(&config, "student"), 0);
        assert_eq!(count(&config, "subject"), 0);
    }
}
