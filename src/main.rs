// ==========================================
// 课程排课系统 - 命令行入口
// ==========================================
// 用法:
//   class-timetable init
//   class-timetable import <batches|subjects|faculty|rooms|assignments> <file>
//   class-timetable generate
//   class-timetable show [batch <id> | faculty <id>]
//   class-timetable config [set <key> <value>]
//
// 数据库路径: CLASS_TIMETABLE_DB_PATH 或用户数据目录
// 日志: RUST_LOG 控制级别
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use class_timetable::app::{get_default_db_path, AppState};
use class_timetable::domain::TimetableFilter;
use class_timetable::importer::CatalogKind;
use std::sync::Arc;

const USAGE: &str = "用法: class-timetable <init | import <kind> <file> | generate \
    | show [batch <id> | faculty <id>] | config [set <key> <value>]>";

#[tokio::main]
async fn main() -> Result<()> {
    // CLASS_TIMETABLE_LOG_FORMAT=json 输出 JSON 行日志
    match std::env::var("CLASS_TIMETABLE_LOG_FORMAT").as_deref() {
        Ok("json") => class_timetable::logging::init_json(),
        _ => class_timetable::logging::init(),
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");

    let db_path = get_default_db_path();
    tracing::info!(
        app = class_timetable::APP_NAME,
        version = class_timetable::VERSION,
        db_path = %db_path,
        "启动"
    );

    match command {
        "init" => {
            AppState::new(db_path.clone()).map_err(|e| anyhow!(e))?;
            println!("数据库已初始化: {}", db_path);
        }
        "import" => {
            let kind = args
                .get(1)
                .context(USAGE)?
                .parse::<CatalogKind>()
                .map_err(|e: String| anyhow!(e))?;
            let file = args.get(2).context(USAGE)?;

            let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
            let report = state.catalog_api.import_file(kind, file).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "generate" => {
            let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
            let api = Arc::clone(&state.timetable_api);

            // Ctrl-C 请求取消正在进行的排课
            let cancel_api = Arc::clone(&api);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel_api.cancel_generation();
                }
            });

            let summary = api.generate_timetable().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if !summary.is_complete() {
                eprintln!("{} 个排课请求未能排入", summary.unplaced_count());
            }
        }
        "show" => {
            let filter = parse_filter(&args[1..])?;
            let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
            let entries = state.timetable_api.list_timetable(filter)?;
            for e in &entries {
                println!(
                    "D{} S{} {}-{} {:<8} {:<24} {:<16} {:<12} {}",
                    e.day,
                    e.slot_number,
                    e.start_time.format("%H:%M"),
                    e.end_time.format("%H:%M"),
                    e.batch_name,
                    e.subject_name,
                    e.faculty_name,
                    e.room_name,
                    if e.duration > 1 { "(lab x2)" } else { "" }
                );
            }
            println!("共 {} 条", entries.len());
        }
        "config" => {
            let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
            if args.get(1).map(String::as_str) == Some("set") {
                let key = args.get(2).context(USAGE)?;
                let value = args.get(3).context(USAGE)?;
                state
                    .config_manager
                    .set_config_value(key, value)
                    .map_err(|e| anyhow!(e))?;
            }
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| anyhow!(e))?;
            println!("{}", snapshot);
        }
        "help" | "-h" | "--help" => println!("{}", USAGE),
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}

fn parse_filter(args: &[String]) -> Result<TimetableFilter> {
    match args {
        [] => Ok(TimetableFilter::All),
        [scope, id] => {
            let id: i64 = id.parse().with_context(|| format!("无效的ID: {}", id))?;
            match scope.as_str() {
                "batch" => Ok(TimetableFilter::Batch(id)),
                "faculty" => Ok(TimetableFilter::Faculty(id)),
                other => bail!("未知筛选条件: {}", other),
            }
        }
        _ => bail!(USAGE),
    }
}
