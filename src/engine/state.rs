// ==========================================
// 课程排课系统 - 排课过程状态
// ==========================================
// 三个内存索引, 仅在单次排课内存在:
// - 占用索引: (day, slot) -> [{batch_id, faculty_id}]
// - 班级日负载: batch_id -> day -> 节数
// - 教师节次索引: faculty_id -> day -> [slot]
// 红线: 只由 PlacementCommitter 通过 record() 修改, 三个索引同时更新
// ==========================================

use crate::domain::types::{Day, SlotNumber};
use std::collections::HashMap;

/// 占用索引中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub batch_id: i64,
    pub faculty_id: i64,
}

// ==========================================
// SchedulingState - 排课过程状态
// ==========================================
#[derive(Debug, Default)]
pub struct SchedulingState {
    occupancy: HashMap<(Day, SlotNumber), Vec<Occupant>>,
    batch_load: HashMap<i64, HashMap<Day, u32>>,
    faculty_slots: HashMap<i64, HashMap<Day, Vec<SlotNumber>>>,
}

impl SchedulingState {
    /// 每次排课开始时新建空状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 班级当日已排节数（实验课按一次计）
    pub fn batch_load(&self, batch_id: i64, day: Day) -> u32 {
        self.batch_load
            .get(&batch_id)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// 教师当日已占用的节次
    pub fn faculty_slots(&self, faculty_id: i64, day: Day) -> &[SlotNumber] {
        self.faculty_slots
            .get(&faculty_id)
            .and_then(|days| days.get(&day))
            .map(|slots| slots.as_slice())
            .unwrap_or(&[])
    }

    /// 某节次的全部占用
    pub fn occupants(&self, day: Day, slot: SlotNumber) -> &[Occupant] {
        self.occupancy
            .get(&(day, slot))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 班级在某节次是否已有课
    pub fn batch_occupies(&self, batch_id: i64, day: Day, slot: SlotNumber) -> bool {
        self.occupants(day, slot).iter().any(|o| o.batch_id == batch_id)
    }

    /// 记录一次已提交的落位
    ///
    /// # 参数
    /// - duration: 占用节数（实验课为 2，同时登记起始节次与下一节）
    ///
    /// 日负载按一次落位加 1
    pub(crate) fn record(
        &mut self,
        batch_id: i64,
        faculty_id: i64,
        day: Day,
        slot: SlotNumber,
        duration: u8,
    ) {
        let occupant = Occupant { batch_id, faculty_id };
        let faculty_day = self
            .faculty_slots
            .entry(faculty_id)
            .or_default()
            .entry(day)
            .or_default();

        for s in slot..slot + duration {
            self.occupancy.entry((day, s)).or_default().push(occupant);
            faculty_day.push(s);
        }

        *self
            .batch_load
            .entry(batch_id)
            .or_default()
            .entry(day)
            .or_insert(0) += 1;
    }

    /// 已记录的落位次数
    pub fn placement_count(&self) -> u32 {
        self.batch_load
            .values()
            .flat_map(|days| days.values())
            .sum()
    }
}
