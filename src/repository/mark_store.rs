// ==========================================
// 成绩表导入系统 - 成绩仓储 Trait
// ==========================================
// 职责: 定义写入（Upsert）与只读查询接口（不包含实现）
// 实现者: MarkUpsertRepository / MarkQueryRepository（SQLite）
// ==========================================

use crate::domain::StoreOutcome;
use crate::repository::error::RepositoryResult;

// ==========================================
// MarkStore Trait
// ==========================================
// 用途: 导入编排器的落库接口
pub trait MarkStore {
    /// 写入一条成绩（查找或创建学生/科目 + 条件插入关联）
    ///
    /// # 说明
    /// - 三个步骤在同一事务内: 全部提交或全部回滚
    /// - 完全相同的关联已存在时静默跳过,返回 AlreadyPresent
    fn store_mark(
        &self,
        name: &str,
        last_name: &str,
        subject: &str,
        year: &str,
        mark: f64,
    ) -> RepositoryResult<StoreOutcome>;
}

// ==========================================
// MarkQueries Trait
// ==========================================
// 用途: 统计查询接口（只读,每次调用独立事务）
// 红线: 只返回原始计数/列表,不计算百分比
pub trait MarkQueries {
    /// 及格人次（mark >= 5）
    fn count_passed(&self, subject: &str, year: &str) -> RepositoryResult<i64>;

    /// 不及格人次（mark < 5）
    fn count_failed(&self, subject: &str, year: &str) -> RepositoryResult<i64>;

    /// 选课人次（不区分分数）
    fn count_enrolled(&self, subject: &str, year: &str) -> RepositoryResult<i64>;

    /// 及格学生列表（"Name LastName"）
    fn list_passed(&self, subject: &str, year: &str) -> RepositoryResult<Vec<String>>;

    /// 不及格学生列表
    fn list_failed(&self, subject: &str, year: &str) -> RepositoryResult<Vec<String>>;

    /// 选课学生列表
    fn list_enrolled(&self, subject: &str, year: &str) -> RepositoryResult<Vec<String>>;

    /// 某学年的科目列表
    fn list_subjects(&self, year: &str) -> RepositoryResult<Vec<String>>;
}
