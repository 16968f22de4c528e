// ==========================================
// 课程排课系统 - 选房策略
// ==========================================
// 与冲突校验解耦: 更换选房策略不影响 ConstraintChecker
// ==========================================

use crate::domain::catalog::Room;
use crate::domain::timetable::AssignmentRequest;
use crate::domain::types::RoomStrategy;

/// 选房策略接口
pub trait RoomSelector: Send + Sync {
    /// 为请求选择教室; None 表示没有合适教室
    fn select<'a>(&self, request: &AssignmentRequest, rooms: &'a [Room]) -> Option<&'a Room>;

    fn name(&self) -> &'static str;
}

/// 始终使用教室清单第一项（不匹配容量与类型）
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstRoomSelector;

impl RoomSelector for FirstRoomSelector {
    fn select<'a>(&self, _request: &AssignmentRequest, rooms: &'a [Room]) -> Option<&'a Room> {
        rooms.first()
    }

    fn name(&self) -> &'static str {
        "FIRST_ROOM"
    }
}

/// 按课程类型与班级人数匹配第一间合适教室
#[derive(Debug, Clone, Copy, Default)]
pub struct KindAwareRoomSelector;

impl RoomSelector for KindAwareRoomSelector {
    fn select<'a>(&self, request: &AssignmentRequest, rooms: &'a [Room]) -> Option<&'a Room> {
        rooms.iter().find(|room| {
            room.kind.supports(request.subject_kind) && room.capacity >= request.batch_student_count
        })
    }

    fn name(&self) -> &'static str {
        "KIND_AWARE"
    }
}

/// 按配置构造选房策略
pub fn selector_for(strategy: RoomStrategy) -> Box<dyn RoomSelector> {
    match strategy {
        RoomStrategy::FirstRoom => Box::new(FirstRoomSelector),
        RoomStrategy::KindAware => Box::new(KindAwareRoomSelector),
    }
}
