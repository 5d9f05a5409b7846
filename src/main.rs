// ==========================================
// 成绩表导入系统 - 命令行入口
// ==========================================
// 用法: gradebook-ingest --input-file <path> [--summary-json] [--no-menu]
// 配置: DB_NAME / DB_USER / DB_PASS / DB_HOST / DB_PORT（可由 .env 提供）
// ==========================================

use anyhow::Context;
use clap::Parser;
use gradebook_ingest::app::run_menu;
use gradebook_ingest::{
    logging, DbConfig, GradebookImporter, MarkQueryRepository, MarkUpsertRepository,
};
use std::io;
use std::path::PathBuf;

/// Excel 成绩册导入与统计查询
#[derive(Debug, Parser)]
#[command(name = "gradebook-ingest", version, about)]
struct Cli {
    /// 待导入的成绩册文件（.xlsx / .xls）
    #[arg(long = "input-file", value_name = "PATH")]
    input_file: PathBuf,

    /// 以 JSON 格式在 stderr 输出导入汇总
    #[arg(long)]
    summary_json: bool,

    /// 导入后不进入交互式查询菜单
    #[arg(long)]
    no_menu: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", gradebook_ingest::APP_NAME, gradebook_ingest::VERSION);
    tracing::info!("==================================================");

    // 配置只构造一次,按引用传入仓储
    let config = DbConfig::from_env().context("数据库配置不完整")?;
    tracing::info!(
        db = %config.describe(),
        conflict_policy = %config.conflict_policy,
        "使用数据库"
    );

    let upsert_repo = MarkUpsertRepository::new(&config).context("无法初始化成绩写入仓储")?;
    let importer = GradebookImporter::new(upsert_repo);

    let summary = importer
        .import_file(&cli.input_file)
        .with_context(|| format!("导入失败: {}", cli.input_file.display()))?;

    if cli.summary_json {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if cli.no_menu {
        return Ok(());
    }

    let queries = MarkQueryRepository::new(&config).context("无法初始化成绩查询仓储")?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_menu(&queries, &mut input, &mut output)?;

    Ok(())
}
