// ==========================================
// 成绩表导入系统 - 列校验
// ==========================================
// 表头必须严格等于 Name | Last name | Mark（区分大小写与顺序）
// ==========================================

use crate::importer::workbook::CellValue;

/// 期望的表头
pub const EXPECTED_COLUMNS: [&str; 3] = ["Name", "Last name", "Mark"];

/// 校验表头是否与期望列完全一致
///
/// 不允许多列、少列、换序; 单元格文本逐字比较（含空白）
pub fn validate_columns(header: &[CellValue]) -> bool {
    header.len() == EXPECTED_COLUMNS.len()
        && header
            .iter()
            .zip(EXPECTED_COLUMNS.iter())
            .all(|(cell, expected)| match cell {
                CellValue::Text(text) => text.as_str() == *expected,
                _ => false,
            })
}
