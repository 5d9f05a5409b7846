// ==========================================
// 成绩表导入系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含导入逻辑,只做数据读写
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 每个操作独立连接 + 独立事务,不跨操作持有连接
// ==========================================

pub mod error;
pub mod mark_query_repo;
pub mod mark_store;
pub mod mark_upsert_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use mark_query_repo::MarkQueryRepository;
pub use mark_store::{MarkQueries, MarkStore};
pub use mark_upsert_repo::MarkUpsertRepository;
