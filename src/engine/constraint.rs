// ==========================================
// 课程排课系统 - 冲突校验引擎
// ==========================================
// 纯函数: 只读 SchedulingState, 无副作用
// 规则（须全部满足）:
// 1) 班级日上限: 班级当日已排 < 4
// 2) 教师休息: 教师当日 slot-1 / slot+1 无课
//    注: 不检查教师在同一 slot 是否已为其他班级上课
// 3) 班级节次互斥: 班级在 (day, slot) 无课
// 4) 实验课连堂: 实验课的 slot+1 必须存在且班级空闲
// 可选增强: 教师同一节次互斥（默认关闭）
// ==========================================

use crate::domain::timetable::{AssignmentRequest, RejectReason};
use crate::domain::types::{Day, SlotNumber, MAX_DAILY_CLASSES_PER_BATCH, SLOTS_PER_DAY};
use crate::engine::state::SchedulingState;

// ==========================================
// ConstraintChecker - 冲突校验器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConstraintChecker {
    faculty_slot_exclusive: bool,
}

impl ConstraintChecker {
    /// 默认规则集（保留教师同节次缺口）
    pub fn new() -> Self {
        Self::default()
    }

    /// 启用教师同一节次互斥
    pub fn with_faculty_slot_exclusive(mut self, enabled: bool) -> Self {
        self.faculty_slot_exclusive = enabled;
        self
    }

    pub fn faculty_slot_exclusive(&self) -> bool {
        self.faculty_slot_exclusive
    }

    /// 候选 (day, slot) 是否可落位
    pub fn accepts(
        &self,
        request: &AssignmentRequest,
        day: Day,
        slot: SlotNumber,
        state: &SchedulingState,
    ) -> bool {
        self.check(request, day, slot, state).is_ok()
    }

    /// 校验候选 (day, slot)，返回第一条不满足的规则
    pub fn check(
        &self,
        request: &AssignmentRequest,
        day: Day,
        slot: SlotNumber,
        state: &SchedulingState,
    ) -> Result<(), RejectReason> {
        // 1) 班级日上限
        if state.batch_load(request.batch_id, day) >= MAX_DAILY_CLASSES_PER_BATCH {
            return Err(RejectReason::BatchDailyCap);
        }

        // 2) 教师休息（相邻节次）
        let faculty_slots = state.faculty_slots(request.faculty_id, day);
        let before = slot.checked_sub(1);
        let after = slot + 1;
        if before.is_some_and(|s| faculty_slots.contains(&s)) || faculty_slots.contains(&after) {
            return Err(RejectReason::FacultyRest);
        }

        if self.faculty_slot_exclusive && faculty_slots.contains(&slot) {
            return Err(RejectReason::FacultySlotTaken);
        }

        // 3) 班级节次互斥
        if state.batch_occupies(request.batch_id, day, slot) {
            return Err(RejectReason::BatchSlotTaken);
        }

        // 4) 实验课连堂
        if request.is_lab() {
            if slot >= SLOTS_PER_DAY {
                return Err(RejectReason::LabContiguity);
            }
            if state.batch_occupies(request.batch_id, day, slot + 1) {
                return Err(RejectReason::LabContiguity);
            }
            if self.faculty_slot_exclusive && faculty_slots.contains(&(slot + 1)) {
                return Err(RejectReason::FacultySlotTaken);
            }
        }

        Ok(())
    }
}
