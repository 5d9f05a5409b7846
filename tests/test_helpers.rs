// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库配置 + 测试成绩册生成
// ==========================================

#![allow(dead_code)]

use gradebook_ingest::DbConfig;
use rust_xlsxwriter::Workbook;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 一行成绩: (名, 姓, 分数)
pub type MarkRow<'a> = (&'a str, &'a str, f64);

/// 创建指向临时目录中数据库文件的配置
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - DbConfig: 数据库配置
pub fn create_test_config() -> Result<(TempDir, DbConfig), Box<dyn Error>> {
    create_test_config_with_policy("keep-distinct")
}

pub fn create_test_config_with_policy(
    policy: &str,
) -> Result<(TempDir, DbConfig), Box<dyn Error>> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("gradebook.db");

    let mut env = HashMap::new();
    env.insert("DB_NAME", db_path.to_string_lossy().to_string());
    env.insert("DB_USER", "tester".to_string());
    env.insert("DB_PASS", "secret".to_string());
    env.insert("DB_HOST", "localhost".to_string());
    env.insert("DB_PORT", "5432".to_string());
    env.insert("MARK_CONFLICT_POLICY", policy.to_string());

    let config = DbConfig::from_lookup(|key| env.get(key).cloned())?;
    Ok((temp_dir, config))
}

/// 按表头写出一个工作表
pub fn write_gradebook(
    path: &Path,
    sheets: &[(&str, &[&str], &[MarkRow])],
) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();

    for (sheet_name, header, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name)?;

        for (col, title) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }
        for (idx, (name, last_name, mark)) in rows.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, *name)?;
            worksheet.write_string(row, 1, *last_name)?;
            worksheet.write_number(row, 2, *mark)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// 标准表头
pub const HEADER: &[&str] = &["Name", "Last name", "Mark"];

/// Math 3 2019-2020 示例数据
pub const MATH_ROWS: &[MarkRow] = &[
    ("Tov", "Rod", 9.9),
    ("Isa", "Garvi", 2.0),
    ("Mar", "Sousa", 8.9),
];

/// 在临时目录中生成只含一个 "Math 3 2019-2020" 工作表的成绩册
pub fn write_math_gradebook(dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join("marks.xlsx");
    write_gradebook(&path, &[("Math 3 2019-2020", HEADER, MATH_ROWS)])?;
    Ok(path)
}
