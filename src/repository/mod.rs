// ==========================================
// 课程排课系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod assignment_repo;
pub mod batch_repo;
pub mod error;
pub mod faculty_repo;
pub mod generation_lock_repo;
pub mod room_repo;
pub mod subject_repo;
pub mod time_slot_repo;
pub mod timetable_repo;

// 重导出核心仓储
pub use assignment_repo::AssignmentRepository;
pub use batch_repo::BatchRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use faculty_repo::FacultyRepository;
pub use generation_lock_repo::GenerationLockRepository;
pub use room_repo::RoomRepository;
pub use subject_repo::SubjectRepository;
pub use time_slot_repo::TimeSlotRepository;
pub use timetable_repo::TimetableRepository;

use chrono::NaiveTime;
use rusqlite::types::Type;
use rusqlite::Row;

/// 文本列解析失败 → rusqlite 转换错误
pub(crate) fn text_conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// 解析 "HH:MM" 格式的时间列
pub(crate) fn parse_time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(idx)?;
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| text_conversion_error(idx, format!("时间格式错误 '{}': {}", raw, e)))
}
