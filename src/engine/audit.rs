// ==========================================
// 课程排课系统 - 课表审计
// ==========================================
// 对已持久化的落位记录重新校验全部硬约束
// 用途: 排课完成后的自检, 以及属性测试
// ==========================================

use crate::domain::timetable::PlacementRecord;
use crate::domain::types::{
    is_valid_day, is_valid_slot, Day, SlotNumber, MAX_DAILY_CLASSES_PER_BATCH, SLOTS_PER_DAY,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// 审计违规项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditViolation {
    OutOfGrid { record_id: i64, day: Day, slot_number: SlotNumber },
    InvalidDuration { record_id: i64, duration: u8 },
    LabOverflow { record_id: i64, day: Day, slot_number: SlotNumber },
    BatchDailyCapExceeded { batch_id: i64, day: Day, count: u32 },
    FacultyAdjacent { faculty_id: i64, day: Day, first_slot: SlotNumber, second_slot: SlotNumber },
    BatchDoubleBooked { batch_id: i64, day: Day, slot_number: SlotNumber },
    FacultyDoubleBooked { faculty_id: i64, day: Day, slot_number: SlotNumber },
}

impl fmt::Display for AuditViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditViolation::OutOfGrid { record_id, day, slot_number } => {
                write!(f, "记录 {} 超出网格: day={} slot={}", record_id, day, slot_number)
            }
            AuditViolation::InvalidDuration { record_id, duration } => {
                write!(f, "记录 {} 时长非法: {}", record_id, duration)
            }
            AuditViolation::LabOverflow { record_id, day, slot_number } => {
                write!(f, "记录 {} 实验课越界: day={} slot={}", record_id, day, slot_number)
            }
            AuditViolation::BatchDailyCapExceeded { batch_id, day, count } => {
                write!(f, "班级 {} 在 day={} 排了 {} 节", batch_id, day, count)
            }
            AuditViolation::FacultyAdjacent { faculty_id, day, first_slot, second_slot } => write!(
                f,
                "教师 {} 在 day={} 连续上课: slot {} 与 {}",
                faculty_id, day, first_slot, second_slot
            ),
            AuditViolation::BatchDoubleBooked { batch_id, day, slot_number } => {
                write!(f, "班级 {} 在 day={} slot={} 重复排课", batch_id, day, slot_number)
            }
            AuditViolation::FacultyDoubleBooked { faculty_id, day, slot_number } => {
                write!(f, "教师 {} 在 day={} slot={} 重复排课", faculty_id, day, slot_number)
            }
        }
    }
}

/// 审计一组落位记录
///
/// # 参数
/// - records: 一次完整排课写入的全部记录
/// - faculty_slot_exclusive: 是否同时检查教师同一节次重复
///
/// 教师相邻检查只比较起始节次
pub fn audit_placements(
    records: &[PlacementRecord],
    faculty_slot_exclusive: bool,
) -> Vec<AuditViolation> {
    let mut violations = Vec::new();

    let mut batch_day_count: HashMap<(i64, Day), u32> = HashMap::new();
    let mut faculty_starts: HashMap<(i64, Day), Vec<SlotNumber>> = HashMap::new();
    let mut batch_cells: HashMap<(i64, Day, SlotNumber), u32> = HashMap::new();
    let mut faculty_cells: HashMap<(i64, Day, SlotNumber), u32> = HashMap::new();

    for record in records {
        if !is_valid_day(record.day) || !is_valid_slot(record.slot_number) {
            violations.push(AuditViolation::OutOfGrid {
                record_id: record.id,
                day: record.day,
                slot_number: record.slot_number,
            });
        }
        if !(1..=2).contains(&record.duration) {
            violations.push(AuditViolation::InvalidDuration {
                record_id: record.id,
                duration: record.duration,
            });
        }
        if record.duration == 2 && record.slot_number >= SLOTS_PER_DAY {
            violations.push(AuditViolation::LabOverflow {
                record_id: record.id,
                day: record.day,
                slot_number: record.slot_number,
            });
        }

        *batch_day_count.entry((record.batch_id, record.day)).or_insert(0) += 1;
        faculty_starts
            .entry((record.faculty_id, record.day))
            .or_default()
            .push(record.slot_number);

        for slot in record.occupied_slots() {
            *batch_cells.entry((record.batch_id, record.day, slot)).or_insert(0) += 1;
            *faculty_cells.entry((record.faculty_id, record.day, slot)).or_insert(0) += 1;
        }
    }

    let mut caps: Vec<_> = batch_day_count
        .into_iter()
        .filter(|(_, count)| *count > MAX_DAILY_CLASSES_PER_BATCH)
        .collect();
    caps.sort();
    violations.extend(caps.into_iter().map(|((batch_id, day), count)| {
        AuditViolation::BatchDailyCapExceeded { batch_id, day, count }
    }));

    let mut faculty_keys: Vec<_> = faculty_starts.keys().copied().collect();
    faculty_keys.sort();
    for key in faculty_keys {
        let mut slots = faculty_starts[&key].clone();
        slots.sort_unstable();
        slots.dedup();
        for pair in slots.windows(2) {
            if pair[1] == pair[0] + 1 {
                violations.push(AuditViolation::FacultyAdjacent {
                    faculty_id: key.0,
                    day: key.1,
                    first_slot: pair[0],
                    second_slot: pair[1],
                });
            }
        }
    }

    let mut doubled: Vec<_> = batch_cells
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(cell, _)| cell)
        .collect();
    doubled.sort();
    violations.extend(doubled.into_iter().map(|(batch_id, day, slot_number)| {
        AuditViolation::BatchDoubleBooked { batch_id, day, slot_number }
    }));

    if faculty_slot_exclusive {
        let mut doubled: Vec<_> = faculty_cells
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(cell, _)| cell)
            .collect();
        doubled.sort();
        violations.extend(doubled.into_iter().map(|(faculty_id, day, slot_number)| {
            AuditViolation::FacultyDoubleBooked { faculty_id, day, slot_number }
        }));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: i64,
        batch: i64,
        faculty: i64,
        day: Day,
        slot: SlotNumber,
        duration: u8,
    ) -> PlacementRecord {
        PlacementRecord {
            id,
            batch_id: batch,
            subject_id: id,
            faculty_id: faculty,
            room_id: 1,
            day,
            slot_number: slot,
            duration,
        }
    }

    #[test]
    fn test_clean_timetable_has_no_violations() {
        let records = vec![
            record(1, 1, 1, 1, 1, 1),
            record(2, 1, 2, 1, 2, 2),
            record(3, 2, 1, 1, 3, 1),
            record(4, 2, 1, 1, 5, 1),
        ];
        assert!(audit_placements(&records, true).is_empty());
    }

    #[test]
    fn test_detects_batch_cap_and_overlap() {
        let records = vec![
            record(1, 1, 1, 2, 1, 1),
            record(2, 1, 2, 2, 2, 2),
            record(3, 1, 3, 2, 3, 1),
            record(4, 1, 4, 2, 5, 1),
            record(5, 1, 5, 2, 6, 1),
        ];
        let violations = audit_placements(&records, false);
        assert!(violations.contains(&AuditViolation::BatchDailyCapExceeded {
            batch_id: 1,
            day: 2,
            count: 5
        }));
        assert!(violations.contains(&AuditViolation::BatchDoubleBooked {
            batch_id: 1,
            day: 2,
            slot_number: 3
        }));
    }

    #[test]
    fn test_detects_faculty_adjacency_and_lab_overflow() {
        let records = vec![
            record(1, 1, 9, 4, 2, 1),
            record(2, 2, 9, 4, 3, 1),
            record(3, 3, 8, 5, 6, 2),
        ];
        let violations = audit_placements(&records, false);
        assert!(violations.contains(&AuditViolation::FacultyAdjacent {
            faculty_id: 9,
            day: 4,
            first_slot: 2,
            second_slot: 3
        }));
        assert!(violations.contains(&AuditViolation::LabOverflow {
            record_id: 3,
            day: 5,
            slot_number: 6
        }));
    }

    #[test]
    fn test_faculty_double_booking_only_checked_when_enabled() {
        let records = vec![record(1, 1, 9, 1, 3, 1), record(2, 2, 9, 1, 3, 1)];
        assert!(audit_placements(&records, false).is_empty());
        assert_eq!(
            audit_placements(&records, true),
            vec![AuditViolation::FacultyDoubleBooked {
                faculty_id: 9,
                day: 1,
                slot_number: 3
            }]
        );
    }

    #[test]
    fn test_out_of_grid_and_bad_duration() {
        let records = vec![record(1, 1, 1, 7, 0, 3)];
        let violations = audit_placements(&records, false);
        assert!(violations.contains(&AuditViolation::OutOfGrid {
            record_id: 1,
            day: 7,
            slot_number: 0
        }));
        assert!(violations.contains(&AuditViolation::InvalidDuration {
            record_id: 1,
            duration: 3
        }));
    }
}
