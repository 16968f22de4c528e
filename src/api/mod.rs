// ==========================================
// 课程排课系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod catalog_api;
pub mod error;
pub mod timetable_api;

// 重导出核心类型
pub use catalog_api::CatalogApi;
pub use error::{ApiError, ApiResult};
pub use timetable_api::TimetableApi;
