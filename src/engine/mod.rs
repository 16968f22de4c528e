// ==========================================
// 课程排课系统 - 引擎层
// ==========================================
// 职责: 实现排课规则与探测流程, 不拼 SQL
// 红线: Engine 不拼 SQL, 每次拒绝都有 RejectReason
// ==========================================

pub mod audit;
pub mod cancellation;
pub mod committer;
pub mod constraint;
pub mod error;
pub mod probe;
pub mod room_selector;
pub mod scheduler;
pub mod state;
pub mod store;

// 重导出核心引擎
pub use audit::{audit_placements, AuditViolation};
pub use cancellation::CancellationFlag;
pub use committer::PlacementCommitter;
pub use constraint::ConstraintChecker;
pub use error::{SchedulerError, SchedulerResult};
pub use probe::{ProbeSource, RandomProbeSource};
pub use room_selector::{selector_for, FirstRoomSelector, KindAwareRoomSelector, RoomSelector};
pub use scheduler::{TimetableScheduler, REASON_NO_SUITABLE_ROOM, REASON_PROBES_EXHAUSTED};
pub use state::{Occupant, SchedulingState};
pub use store::{InMemoryPlacementStore, PlacementStore};
