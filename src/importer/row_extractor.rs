// ==========================================
// 成绩表导入系统 - 行数据提取
// ==========================================
// 从第 1 行开始（第 0 行为表头）惰性产出学生记录
// 规则:
// - 完全空白行跳过
// - 单元格数 != 3 → RowShape
// - 姓名为空 / 分数非数值 → InvalidCell
// ==========================================

use crate::domain::StudentRecord;
use crate::importer::column_validator::EXPECTED_COLUMNS;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook::{CellValue, Sheet};

/// 惰性提取工作表数据行
///
/// # 参数
/// - sheet: 工作表
/// - row_count: 行数（含表头）,通常为 sheet.row_count()
///
/// # 返回
/// 每个数据行对应一个 ImportResult<StudentRecord>
pub fn extract_rows(
    sheet: &Sheet,
    row_count: usize,
) -> impl Iterator<Item = ImportResult<StudentRecord>> + '_ {
    (1..row_count.min(sheet.row_count())).filter_map(move |row_idx| {
        let cells = sheet.row(row_idx)?;
        if cells.iter().all(CellValue::is_empty) {
            return None;
        }
        Some(parse_row(&sheet.name, row_idx, cells))
    })
}

fn parse_row(sheet: &str, row: usize, cells: &[CellValue]) -> ImportResult<StudentRecord> {
    if cells.len() != EXPECTED_COLUMNS.len() {
        return Err(ImportError::RowShape {
            sheet: sheet.to_string(),
            row,
            cells: cells.len(),
        });
    }

    let name = required_text(sheet, row, 0, &cells[0])?;
    let last_name = required_text(sheet, row, 1, &cells[1])?;

    if cells[2].is_empty() {
        return Err(ImportError::InvalidCell {
            sheet: sheet.to_string(),
            row,
            column: EXPECTED_COLUMNS[2].to_string(),
            message: "单元格为空".to_string(),
        });
    }

    let mark = match cells[2].as_number() {
        Some(mark) if mark.is_finite() => mark,
        _ => {
            return Err(ImportError::InvalidCell {
                sheet: sheet.to_string(),
                row,
                column: EXPECTED_COLUMNS[2].to_string(),
                message: format!("分数不是数值: '{}'", cells[2]),
            })
        }
    };

    Ok(StudentRecord {
        row_number: row,
        name,
        last_name,
        mark,
    })
}

fn required_text(sheet: &str, row: usize, col: usize, cell: &CellValue) -> ImportResult<String> {
    cell.as_text()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ImportError::InvalidCell {
            sheet: sheet.to_string(),
            row,
            column: EXPECTED_COLUMNS[col].to_string(),
            message: "单元格为空".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn math_sheet(rows: Vec<Vec<CellValue>>) -> Sheet {
        let mut all = vec![vec![text("Name"), text("Last name"), text("Mark")]];
        all.extend(rows);
        Sheet::new("Math 3 2019-2020", all)
    }

    #[test]
    fn test_extracts_rows_after_header() {
        let sheet = math_sheet(vec![
            vec![text("Tov"), text("Rod"), CellValue::Number(9.9)],
            vec![text("Isa"), text("Garvi"), CellValue::Number(2.0)],
        ]);

        let records: Vec<StudentRecord> = extract_rows(&sheet, sheet.row_count())
            .collect::<ImportResult<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Tov");
        assert_eq!(records[0].last_name, "Rod");
        assert_eq!(records[0].mark, 9.9);
        assert_eq!(records[0].row_number, 1);
        assert_eq!(records[1].row_number, 2);
    }

    #[test]
    fn test_header_only_sheet_yields_nothing() {
        let sheet = math_sheet(vec![]);
        assert_eq!(extract_rows(&sheet, sheet.row_count()).count(), 0);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let sheet = math_sheet(vec![
            vec![text("Tov"), text("Rod"), CellValue::Number(9.9)],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
            vec![text("Mar"), text("Sousa"), CellValue::Number(8.9)],
        ]);

        let records: Vec<StudentRecord> = extract_rows(&sheet, sheet.row_count())
            .collect::<ImportResult<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].row_number, 3);
    }

    #[test]
    fn test_numeric_text_mark_is_accepted() {
        let sheet = math_sheet(vec![vec![text("Pau"), text("Real"), text("4.0")]]);
        let record = extract_rows(&sheet, sheet.row_count())
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(record.mark, 4.0);
    }

    #[test]
    fn test_short_row_is_shape_error() {
        let sheet = math_sheet(vec![vec![text("Tov"), text("Rod")]]);
        let result = extract_rows(&sheet, sheet.row_count()).next().unwrap();
        assert!(matches!(
            result,
            Err(ImportError::RowShape { row: 1, cells: 2, .. })
        ));
    }

    #[test]
    fn test_long_row_is_shape_error() {
        let sheet = math_sheet(vec![vec![
            text("Tov"),
            text("Rod"),
            CellValue::Number(9.9),
            text("extra"),
        ]]);
        let result = extract_rows(&sheet, sheet.row_count()).next().unwrap();
        assert!(matches!(result, Err(ImportError::RowShape { cells: 4, .. })));
    }

    #[test]
    fn test_non_numeric_mark_is_cell_error() {
        let sheet = math_sheet(vec![vec![text("Tov"), text("Rod"), text("absent")]]);
        let result = extract_rows(&sheet, sheet.row_count()).next().unwrap();
        match result {
            Err(ImportError::InvalidCell { column, row, .. }) => {
                assert_eq!(column, "Mark");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidCell, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_mark_is_cell_error_not_shape_error() {
        let sheet = math_sheet(vec![vec![text("Tov"), text("Rod"), CellValue::Empty]]);
        let result = extract_rows(&sheet, sheet.row_count()).next().unwrap();
        match result {
            Err(ImportError::InvalidCell { column, row, message, .. }) => {
                assert_eq!(column, "Mark");
                assert_eq!(row, 1);
                assert_eq!(message, "单元格为空");
            }
            other => panic!("expected InvalidCell, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_name_is_cell_error() {
        let sheet = math_sheet(vec![vec![CellValue::Empty, text("Rod"), CellValue::Number(7.0)]]);
        let result = extract_rows(&sheet, sheet.row_count()).next().unwrap();
        assert!(matches!(
            result,
            Err(ImportError::InvalidCell { ref column, .. }) if column == "Name"
        ));
    }

    #[test]
    fn test_row_count_limits_iteration() {
        let sheet = math_sheet(vec![
            vec![text("Tov"), text("Rod"), CellValue::Number(9.9)],
            vec![text("Isa"), text("Garvi"), CellValue::Number(2.0)],
        ]);
        assert_eq!(extract_rows(&sheet, 2).count(), 1);
    }
}
