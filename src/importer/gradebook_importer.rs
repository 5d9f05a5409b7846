// ==========================================
// 成绩表导入系统 - 成绩册导入编排器
// ==========================================
// 流程（严格顺序,逐表逐行）:
// 扩展名检查 → 打开工作簿 → [工作表名解析 → 列校验 → 行提取 → 落库]*
//
// 失败语义:
// - 任一工作表失败即终止整个导入,不继续后续工作表
// - 每次落库独立提交,已处理的行保留在库中
// ==========================================

use crate::domain::{SheetKey, StoreOutcome};
use crate::importer::column_validator::validate_columns;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::row_extractor::extract_rows;
use crate::importer::sheet_name::parse_sheet_name;
use crate::importer::workbook::{is_spreadsheet_path, CalamineWorkbook, Sheet, WorkbookSource};
use crate::repository::MarkStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// 导入汇总
// ==========================================

/// 单个工作表的导入汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetSummary {
    pub sheet_name: String,
    pub subject: String,
    pub year: String,
    pub rows: usize,     // 处理的数据行数
    pub inserted: usize, // 新增关联
    pub skipped: usize,  // 已存在,静默跳过
    pub replaced: usize, // 覆盖旧分数
}

impl SheetSummary {
    fn new(sheet_name: &str, key: &SheetKey) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            subject: key.subject.clone(),
            year: key.year.clone(),
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: StoreOutcome) {
        self.rows += 1;
        match outcome {
            StoreOutcome::Inserted => self.inserted += 1,
            StoreOutcome::AlreadyPresent => self.skipped += 1,
            StoreOutcome::Replaced => self.replaced += 1,
        }
    }
}

/// 一次导入运行的汇总
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub run_id: Uuid,
    pub file: String,
    pub sheets: Vec<SheetSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportSummary {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows).sum()
    }

    pub fn total_inserted(&self) -> usize {
        self.sheets.iter().map(|s| s.inserted).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.sheets.iter().map(|s| s.skipped).sum()
    }
}

// ==========================================
// GradebookImporter - 导入编排器
// ==========================================
pub struct GradebookImporter<S>
where
    S: MarkStore,
{
    store: S,
}

impl<S> GradebookImporter<S>
where
    S: MarkStore,
{
    /// 创建新的导入器
    ///
    /// # 参数
    /// - store: 成绩落库接口（Upsert Engine）
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 从 Excel 文件导入成绩册
    ///
    /// # 返回
    /// - Ok(ImportSummary): 全部工作表导入成功
    /// - Err(NotASpreadsheet): 扩展名不支持（未触及数据库）
    /// - Err(UnreadableFile): 文件损坏
    /// - Err(InvalidSheetName / InvalidColumnOrder / RowShape / InvalidCell / Store): 终止导入
    #[instrument(skip(self, file_path), fields(run_id))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let path = file_path.as_ref();
        let file = path.display().to_string();

        // 扩展名检查先于一切 IO 与落库
        if !is_spreadsheet_path(path) {
            error!(file = %file, "不是 Excel 文件");
            return Err(ImportError::NotASpreadsheet(file));
        }

        let mut workbook = CalamineWorkbook::open(path).map_err(|e| {
            error!(file = %file, error = %e, "工作簿打开失败");
            e
        })?;

        self.import_workbook(&file, &mut workbook)
    }

    /// 从任意工作簿来源导入
    ///
    /// 工作表按工作簿声明顺序逐个处理
    pub fn import_workbook<W: WorkbookSource>(
        &self,
        source_label: &str,
        workbook: &mut W,
    ) -> ImportResult<ImportSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        info!(run_id = %run_id, file = %source_label, "开始导入成绩册");

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let sheet = workbook.read_sheet(&sheet_name)?;
            let summary = self.import_sheet(&sheet).map_err(|e| {
                error!(run_id = %run_id, sheet = %sheet_name, error = %e, "工作表导入失败,终止导入");
                e
            })?;
            sheets.push(summary);
        }

        let summary = ImportSummary {
            run_id,
            file: source_label.to_string(),
            sheets,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            run_id = %run_id,
            sheets = summary.sheets.len(),
            rows = summary.total_rows(),
            inserted = summary.total_inserted(),
            skipped = summary.total_skipped(),
            "成绩册导入完成"
        );

        Ok(summary)
    }

    /// 导入单个工作表
    fn import_sheet(&self, sheet: &Sheet) -> ImportResult<SheetSummary> {
        // === 步骤 1: 工作表名解析 ===
        let key = parse_sheet_name(&sheet.name)?;

        // === 步骤 2: 列校验 ===
        if !validate_columns(sheet.header()) {
            return Err(ImportError::InvalidColumnOrder {
                sheet: sheet.name.clone(),
            });
        }

        // === 步骤 3: 行提取 + 落库 ===
        let mut summary = SheetSummary::new(&sheet.name, &key);
        for record in extract_rows(sheet, sheet.row_count()) {
            let record = record?;
            let outcome = self.store.store_mark(
                &record.name,
                &record.last_name,
                &key.subject,
                &key.year,
                record.mark,
            )?;

            if outcome == StoreOutcome::AlreadyPresent {
                debug!(
                    sheet = %sheet.name,
                    row = record.row_number,
                    name = %record.name,
                    last_name = %record.last_name,
                    "成绩已存在,跳过"
                );
            }
            summary.record(outcome);
        }

        info!(
            sheet = %sheet.name,
            subject = %key.subject,
            year = %key.year,
            rows = summary.rows,
            inserted = summary.inserted,
            skipped = summary.skipped,
            replaced = summary.replaced,
            "工作表导入完成"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::workbook::{CellValue, InMemoryWorkbook};
    use crate::repository::RepositoryResult;
    use std::cell::RefCell;

    // 记录调用的内存 Store
    #[derive(Default)]
    struct RecordingStore {
        calls: RefCell<Vec<(String, String, String, String, f64)>>,
    }

    impl MarkStore for RecordingStore {
        fn store_mark(
            &self,
            name: &str,
            last_name: &str,
            subject: &str,
            year: &str,
            mark: f64,
        ) -> RepositoryResult<StoreOutcome> {
            let mut calls = self.calls.borrow_mut();
            let entry = (
                name.to_string(),
                last_name.to_string(),
                subject.to_string(),
                year.to_string(),
                mark,
            );
            if calls.contains(&entry) {
                return Ok(StoreOutcome::AlreadyPresent);
            }
            calls.push(entry);
            Ok(StoreOutcome::Inserted)
        }
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn header() -> Vec<CellValue> {
        vec![text("Name"), text("Last name"), text("Mark")]
    }

    fn row(name: &str, last_name: &str, mark: f64) -> Vec<CellValue> {
        vec![text(name), text(last_name), CellValue::Number(mark)]
    }

    #[test]
    fn test_import_forwards_every_row() {
        let mut workbook = InMemoryWorkbook::new().with_sheet(Sheet::new(
            "Math 3 2019-2020",
            vec![
                header(),
                row("Tov", "Rod", 9.9),
                row("Isa", "Garvi", 2.0),
                row("Mar", "Sousa", 8.9),
            ],
        ));

        let importer = GradebookImporter::new(RecordingStore::default());
        let summary = importer.import_workbook("memory", &mut workbook).unwrap();

        assert_eq!(summary.sheets.len(), 1);
        assert_eq!(summary.sheets[0].subject, "Math 3");
        assert_eq!(summary.sheets[0].year, "2019-2020");
        assert_eq!(summary.total_rows(), 3);

        let calls = importer.store().calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[1],
            (
                "Isa".to_string(),
                "Garvi".to_string(),
                "Math 3".to_string(),
                "2019-2020".to_string(),
                2.0
            )
        );
    }

    #[test]
    fn test_sheets_processed_in_declared_order() {
        let mut workbook = InMemoryWorkbook::new()
            .with_sheet(Sheet::new("Science 3 2019-2020", vec![header(), row("Tov", "Rod", 4.9)]))
            .with_sheet(Sheet::new("Literature 3 2019-2020", vec![header(), row("Isa", "Garvi", 3.9)]));

        let importer = GradebookImporter::new(RecordingStore::default());
        importer.import_workbook("memory", &mut workbook).unwrap();

        let calls = importer.store().calls.borrow();
        assert_eq!(calls[0].2, "Science 3");
        assert_eq!(calls[1].2, "Literature 3");
    }

    #[test]
    fn test_duplicate_rows_counted_as_skipped() {
        let mut workbook = InMemoryWorkbook::new().with_sheet(Sheet::new(
            "Math 3 2019-2020",
            vec![header(), row("Tov", "Rod", 9.9), row("Tov", "Rod", 9.9)],
        ));

        let importer = GradebookImporter::new(RecordingStore::default());
        let summary = importer.import_workbook("memory", &mut workbook).unwrap();

        assert_eq!(summary.total_inserted(), 1);
        assert_eq!(summary.total_skipped(), 1);
    }

    #[test]
    fn test_bad_header_aborts_and_names_sheet() {
        let mut workbook = InMemoryWorkbook::new()
            .with_sheet(Sheet::new("Math 3 2019-2020", vec![header(), row("Tov", "Rod", 9.9)]))
            .with_sheet(Sheet::new(
                "Lit 3 2019-2020",
                vec![vec![text("Last name"), text("Name"), text("Mark")], row("Isa", "Garvi", 2.0)],
            ))
            .with_sheet(Sheet::new("Science 3 2019-2020", vec![header(), row("Mar", "Sousa", 8.9)]));

        let importer = GradebookImporter::new(RecordingStore::default());
        let result = importer.import_workbook("memory", &mut workbook);

        assert!(matches!(
            result,
            Err(ImportError::InvalidColumnOrder { ref sheet }) if sheet == "Lit 3 2019-2020"
        ));
        // 先前工作表的数据已落库,后续工作表未处理
        let calls = importer.store().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, "Math 3");
    }

    #[test]
    fn test_bad_sheet_name_aborts() {
        let mut workbook = InMemoryWorkbook::new()
            .with_sheet(Sheet::new("Sheet1", vec![header(), row("Tov", "Rod", 9.9)]));

        let importer = GradebookImporter::new(RecordingStore::default());
        let result = importer.import_workbook("memory", &mut workbook);

        assert!(matches!(result, Err(ImportError::InvalidSheetName(ref n)) if n == "Sheet1"));
        assert!(importer.store().calls.borrow().is_empty());
    }

    #[test]
    fn test_empty_sheet_has_invalid_columns() {
        let mut workbook =
            InMemoryWorkbook::new().with_sheet(Sheet::new("Math 3 2019-2020", vec![]));

        let importer = GradebookImporter::new(RecordingStore::default());
        let result = importer.import_workbook("memory", &mut workbook);
        assert!(matches!(result, Err(ImportError::InvalidColumnOrder { .. })));
    }

    #[test]
    fn test_non_spreadsheet_path_never_touches_store() {
        let importer = GradebookImporter::new(RecordingStore::default());
        let result = importer.import_file("grades.csv");

        assert!(matches!(result, Err(ImportError::NotASpreadsheet(_))));
        assert!(importer.store().calls.borrow().is_empty());
    }
}
