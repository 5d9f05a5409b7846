// ==========================================
// 成绩表导入系统 - 导入层
// ==========================================
// 职责: Excel 成绩册 → 校验 → 行记录 → 落库
// 流程: 工作表名解析 → 列校验 → 行提取 → Upsert
// ==========================================

// 模块声明
pub mod column_validator;
pub mod error;
pub mod gradebook_importer;
pub mod row_extractor;
pub mod sheet_name;
pub mod workbook;

// 重导出核心类型
pub use column_validator::{validate_columns, EXPECTED_COLUMNS};
pub use error::{ImportError, ImportResult};
pub use gradebook_importer::{GradebookImporter, ImportSummary, SheetSummary};
pub use row_extractor::extract_rows;
pub use sheet_name::parse_sheet_name;
pub use workbook::{
    is_spreadsheet_path, CalamineWorkbook, CellValue, InMemoryWorkbook, Sheet, WorkbookSource,
};
