// ==========================================
// 成绩表导入系统 - 应用层
// ==========================================
// 职责: 导入后的交互式查询（菜单 + 报表）
// ==========================================

pub mod menu;
pub mod report;

// 重导出
pub use menu::{run_menu, MenuChoice};
pub use report::{percentage, run_query, QueryAnswer, QueryKind};
