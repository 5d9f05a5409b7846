// ==========================================
// 成绩表导入系统 - 工作簿读取
// ==========================================
// 阶段 0: 文件类型检查 + 工作簿打开 + 工作表读取
// 支持: Excel (.xlsx/.xls),仅按扩展名判断,不嗅探内容
// ==========================================

use crate::importer::column_validator::EXPECTED_COLUMNS;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 支持的电子表格扩展名（小写）
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// 按扩展名判断是否为电子表格（大小写不敏感）
pub fn is_spreadsheet_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SPREADSHEET_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

// ==========================================
// CellValue - 单元格值
// ==========================================
// 与具体解析库解耦,只保留成绩表需要的几种形态
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 作为文本读取（去除首尾空白）
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }

    /// 作为数值读取（数值单元格或可解析的数值文本）
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::Error(e) => CellValue::Text(format!("{:?}", e)),
        }
    }
}

// ==========================================
// Sheet - 单个工作表
// ==========================================
// rows[0] 为表头; 超出固定列数的末尾空单元格已去除
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows: rows.into_iter().map(trim_trailing_empty).collect(),
        }
    }

    /// 行数（含表头）
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 表头行（空表返回空切片）
    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(|r| r.as_slice())
    }
}

// calamine 会把每行补齐到已用区域宽度; 固定列以内的空单元格保留,
// 由行提取报告具体是哪一列为空
fn trim_trailing_empty(mut row: Vec<CellValue>) -> Vec<CellValue> {
    while row.len() > EXPECTED_COLUMNS.len()
        && row.last().map(|c| c.is_empty()).unwrap_or(false)
    {
        row.pop();
    }
    row
}

// ==========================================
// WorkbookSource Trait
// ==========================================
// 用途: 导入编排器的数据来源接口
// 实现者: CalamineWorkbook（文件）, InMemoryWorkbook（内存）
pub trait WorkbookSource {
    /// 按工作簿声明顺序返回工作表名
    fn sheet_names(&self) -> Vec<String>;

    /// 读取指定工作表
    fn read_sheet(&mut self, name: &str) -> ImportResult<Sheet>;
}

// ==========================================
// CalamineWorkbook - 基于 calamine 的文件工作簿
// ==========================================
pub struct CalamineWorkbook {
    inner: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    /// 打开 Excel 文件
    ///
    /// # 返回
    /// - Err(NotASpreadsheet): 扩展名不是 .xlsx/.xls
    /// - Err(UnreadableFile): 文件不存在或内容损坏
    pub fn open(path: &Path) -> ImportResult<Self> {
        if !is_spreadsheet_path(path) {
            return Err(ImportError::NotASpreadsheet(path.display().to_string()));
        }

        if !path.exists() {
            return Err(ImportError::UnreadableFile(format!(
                "文件不存在: {}",
                path.display()
            )));
        }

        let inner = open_workbook_auto(path)?;
        Ok(Self { inner })
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<Sheet> {
        let range = self.inner.worksheet_range(name)?;
        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(CellValue::from).collect())
            .collect();
        Ok(Sheet::new(name, rows))
    }
}

// ==========================================
// InMemoryWorkbook - 内存工作簿
// ==========================================
// 用于无文件场景（测试、其他来源的预解析数据）
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<Sheet>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| ImportError::UnreadableFile(format!("工作表不存在: {}", name)))
    }
}
