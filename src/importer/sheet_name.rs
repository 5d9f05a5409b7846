// ==========================================
// 成绩表导入系统 - 工作表名解析
// ==========================================
// 命名约定: "<科目名...> <年级> <学年>"
// 例: "Lit 3 2019-2020" → subject = "Lit 3", year = "2019-2020"
// ==========================================

use crate::domain::SheetKey;
use crate::importer::error::{ImportError, ImportResult};

/// 最少词元数: 科目名(>=1) + 年级 + 学年
pub const MIN_SHEET_NAME_TOKENS: usize = 3;

/// 解析工作表名为 (科目, 学年)
///
/// # 规则
/// - 按空白切分
/// - 最后一个词元为学年标签
/// - 倒数第二个词元为年级
/// - 其余词元以单个空格拼接为科目基础名
/// - 科目名 = 基础名 + " " + 年级
///
/// # 返回
/// - Err(InvalidSheetName): 词元少于 3 个
pub fn parse_sheet_name(sheet_name: &str) -> ImportResult<SheetKey> {
    let tokens: Vec<&str> = sheet_name.split_whitespace().collect();
    if tokens.len() < MIN_SHEET_NAME_TOKENS {
        return Err(ImportError::InvalidSheetName(sheet_name.to_string()));
    }

    let (year, rest) = tokens
        .split_last()
        .ok_or_else(|| ImportError::InvalidSheetName(sheet_name.to_string()))?;
    let (course, base) = rest
        .split_last()
        .ok_or_else(|| ImportError::InvalidSheetName(sheet_name.to_string()))?;

    Ok(SheetKey {
        subject: format!("{} {}", base.join(" "), course),
        year: year.to_string(),
    })
}
