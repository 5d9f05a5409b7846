// ==========================================
// 成绩表导入系统 - 交互式查询菜单
// ==========================================
// 流程: 选择查询 → 输入学年 →（除"学年科目列表"外）输入科目 → 输出结果
// 输入: 任意 BufRead; 输出: 任意 Write（便于测试）
// 退出: 输入 q 或输入流结束
// ==========================================

use crate::app::report::{run_query, QueryKind};
use crate::repository::MarkQueries;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

// ==========================================
// MenuChoice - 菜单选项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PercentageFailed,
    PercentagePassed,
    TotalEnrolled,
    StudentsInSubject,
    SubjectsInYear,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::PercentageFailed,
        MenuChoice::PercentagePassed,
        MenuChoice::TotalEnrolled,
        MenuChoice::StudentsInSubject,
        MenuChoice::SubjectsInYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::PercentageFailed => "某科目不及格学生百分比",
            MenuChoice::PercentagePassed => "某科目及格学生百分比",
            MenuChoice::TotalEnrolled => "某科目选课学生总数",
            MenuChoice::StudentsInSubject => "某科目学生名单",
            MenuChoice::SubjectsInYear => "某学年科目列表",
        }
    }

    /// 菜单编号（从 1 开始）
    pub fn from_index(input: &str) -> Option<Self> {
        let idx: usize = input.trim().parse().ok()?;
        idx.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn needs_subject(self) -> bool {
        !matches!(self, MenuChoice::SubjectsInYear)
    }

    /// 组装查询（SubjectsInYear 忽略 subject）
    pub fn into_query(self, year: String, subject: String) -> QueryKind {
        match self {
            MenuChoice::PercentageFailed => QueryKind::PercentageFailed { subject, year },
            MenuChoice::PercentagePassed => QueryKind::PercentagePassed { subject, year },
            MenuChoice::TotalEnrolled => QueryKind::TotalEnrolled { subject, year },
            MenuChoice::StudentsInSubject => QueryKind::StudentsInSubject { subject, year },
            MenuChoice::SubjectsInYear => QueryKind::SubjectsInYear { year },
        }
    }
}

// 读取一行; None 表示输入流结束
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}: ", message)?;
    output.flush()?;
    read_line(input)
}

fn print_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "需要查询什么数据？")?;
    for (idx, choice) in MenuChoice::ALL.iter().enumerate() {
        writeln!(output, "  {}. {}", idx + 1, choice.label())?;
    }
    writeln!(output, "  q. 退出")?;
    Ok(())
}

/// 运行交互式查询菜单
///
/// 查询失败时输出错误并继续,不中断菜单
pub fn run_menu<Q, R, W>(queries: &Q, input: &mut R, output: &mut W) -> io::Result<()>
where
    Q: MarkQueries + ?Sized,
    R: BufRead,
    W: Write,
{
    writeln!(output, "欢迎使用成绩查询系统")?;

    loop {
        print_menu(output)?;
        let selection = match prompt(input, output, "请选择")? {
            Some(s) => s,
            None => break,
        };
        if selection.eq_ignore_ascii_case("q") {
            break;
        }

        let choice = match MenuChoice::from_index(&selection) {
            Some(choice) => choice,
            None => {
                writeln!(output, "无效的选项: {}", selection)?;
                continue;
            }
        };

        let year = match prompt(input, output, "请输入学年")? {
            Some(y) => y,
            None => break,
        };

        let subject = if choice.needs_subject() {
            match prompt(input, output, "请输入科目")? {
                Some(s) => s,
                None => break,
            }
        } else {
            String::new()
        };

        let kind = choice.into_query(year, subject);
        info!(query = ?choice, year = kind.year(), subject = ?kind.subject(), "执行查询");

        match run_query(queries, &kind) {
            Ok(answer) => writeln!(output, "{}", answer)?,
            Err(e) => {
                warn!(error = %e, "查询失败");
                writeln!(output, "查询失败: {}", e)?;
            }
        }
    }

    writeln!(output, "再见")?;
    Ok(())
}
