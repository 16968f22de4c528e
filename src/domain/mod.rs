// ==========================================
// 课程排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod catalog;
pub mod timetable;
pub mod types;

// 重导出核心类型
pub use catalog::{
    Batch, Faculty, NewBatch, NewFaculty, NewRoom, NewSubject, Room, Subject, TimeSlot,
    DEFAULT_TIME_SLOTS,
};
pub use timetable::{
    AssignmentRequest, GenerationSummary, NewAssignment, NewPlacement, PlacementRecord,
    RejectReason, RejectionTally, TimetableEntry, TimetableFilter, UnplacedRequest,
};
pub use types::{
    Day, RoomKind, RoomStrategy, SlotNumber, SubjectKind, DAYS_PER_WEEK,
    MAX_DAILY_CLASSES_PER_BATCH, MAX_PROBE_ATTEMPTS, SLOTS_PER_DAY,
};
