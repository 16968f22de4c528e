// ==========================================
// 课程排课系统 - 落位提交器
// ==========================================
// 职责: 计算时长 → 持久化 → 更新 SchedulingState
// 红线: 持久化失败时不修改状态
// ==========================================

use crate::domain::catalog::Room;
use crate::domain::timetable::{AssignmentRequest, NewPlacement, PlacementRecord};
use crate::domain::types::{Day, SlotNumber};
use crate::engine::state::SchedulingState;
use crate::engine::store::PlacementStore;
use crate::repository::RepositoryResult;
use std::sync::Arc;
use tracing::debug;

pub struct PlacementCommitter {
    store: Arc<dyn PlacementStore>,
}

impl PlacementCommitter {
    pub fn new(store: Arc<dyn PlacementStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn PlacementStore> {
        &self.store
    }

    /// 提交一次已通过校验的落位
    ///
    /// # 返回
    /// - Ok(PlacementRecord): 已写入的记录（实验课 duration=2，仅记录起始节次）
    /// - Err: 持久化失败，state 保持不变
    pub async fn commit(
        &self,
        request: &AssignmentRequest,
        day: Day,
        slot: SlotNumber,
        room: &Room,
        state: &mut SchedulingState,
    ) -> RepositoryResult<PlacementRecord> {
        let duration = request.subject_kind.duration();
        let placement = NewPlacement {
            batch_id: request.batch_id,
            subject_id: request.subject_id,
            faculty_id: request.faculty_id,
            room_id: room.id,
            day,
            slot_number: slot,
            duration,
        };

        let record = self.store.insert(&placement).await?;
        state.record(request.batch_id, request.faculty_id, day, slot, duration);

        debug!(
            record_id = record.id,
            batch_id = request.batch_id,
            subject_id = request.subject_id,
            faculty_id = request.faculty_id,
            room_id = room.id,
            day,
            slot,
            duration,
            "落位已提交"
        );

        Ok(record)
    }
}
