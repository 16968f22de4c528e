// ==========================================
// 课程排课系统 - 排课引擎错误类型
// ==========================================
// 持久化失败: 终止本次排课, 已写入记录保留（不回滚）
// 请求无法排入: 不属于错误, 记录在 GenerationSummary::unplaced
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("教室清单为空: 有 {request_count} 个排课请求但没有可用教室")]
    EmptyRoomInventory { request_count: usize },

    #[error("排课已取消: 已写入 {placed_so_far} 条落位")]
    Cancelled { placed_so_far: usize },

    #[error("落位持久化失败: {0}")]
    Persistence(#[from] RepositoryError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
