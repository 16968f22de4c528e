// ==========================================
// 课程排课系统 - 课表领域模型
// ==========================================
// 实体: 排课请求 / 落位记录 / 课表视图 / 排课结果
// 红线: 落位记录只由排课引擎生成, 每次全量替换
// ==========================================

use crate::domain::types::{Day, SlotNumber, SubjectKind};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// AssignmentRequest - 排课请求
// ==========================================
// 来源: subject_batch 映射 (课程 + 班级 + 教师)
// 约束: (subject_id, batch_id) 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub id: i64,
    pub subject_id: i64,
    pub batch_id: i64,
    pub faculty_id: i64,

    // ===== 关联快照 (来自 JOIN, 仅用于约束与报告) =====
    pub subject_kind: SubjectKind,
    pub subject_credits: i32,
    pub subject_name: String,
    pub batch_name: String,
    pub faculty_name: String,
    pub batch_student_count: i32,
}

impl AssignmentRequest {
    pub fn is_lab(&self) -> bool {
        self.subject_kind == SubjectKind::Lab
    }
}

/// 新建排课映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
    pub subject_id: i64,
    pub batch_id: i64,
    pub faculty_id: i64,
}

// ==========================================
// PlacementRecord - 落位记录
// ==========================================
// 实验课只记录起始节次, duration=2 表示同时占用下一节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: i64,
    pub batch_id: i64,
    pub subject_id: i64,
    pub faculty_id: i64,
    pub room_id: i64,
    pub day: Day,
    pub slot_number: SlotNumber,
    pub duration: u8,
}

impl PlacementRecord {
    /// 实际占用的节次（起始节次 .. 起始节次+duration）
    pub fn occupied_slots(&self) -> impl Iterator<Item = SlotNumber> {
        self.slot_number..self.slot_number + self.duration
    }
}

/// 待写入的落位（无ID）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlacement {
    pub batch_id: i64,
    pub subject_id: i64,
    pub faculty_id: i64,
    pub room_id: i64,
    pub day: Day,
    pub slot_number: SlotNumber,
    pub duration: u8,
}

impl NewPlacement {
    pub fn into_record(self, id: i64) -> PlacementRecord {
        PlacementRecord {
            id,
            batch_id: self.batch_id,
            subject_id: self.subject_id,
            faculty_id: self.faculty_id,
            room_id: self.room_id,
            day: self.day,
            slot_number: self.slot_number,
            duration: self.duration,
        }
    }
}

// ==========================================
// TimetableEntry - 课表视图行
// ==========================================
// 落位记录 JOIN 课程/班级/教师/教室/节次 的展示模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: i64,
    pub day: Day,
    pub slot_number: SlotNumber,
    pub duration: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,

    pub batch_id: i64,
    pub batch_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub subject_code: String,
    pub subject_kind: SubjectKind,
    pub faculty_id: i64,
    pub faculty_name: String,
    pub room_id: i64,
    pub room_name: String,
}

impl TimetableEntry {
    pub fn occupied_slots(&self) -> impl Iterator<Item = SlotNumber> {
        self.slot_number..self.slot_number + self.duration
    }
}

/// 课表查询过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimetableFilter {
    All,
    Batch(i64),
    Faculty(i64),
}

// ==========================================
// RejectReason - 探测被拒原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    BatchDailyCap,      // 班级当日已满 4 节
    FacultyRest,        // 教师相邻节次已有课
    FacultySlotTaken,   // 教师同一节次已有课（可选增强规则）
    BatchSlotTaken,     // 班级该节次已有课
    LabContiguity,      // 实验课下一节不可用
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::BatchDailyCap => write!(f, "BATCH_DAILY_CAP"),
            RejectReason::FacultyRest => write!(f, "FACULTY_REST"),
            RejectReason::FacultySlotTaken => write!(f, "FACULTY_SLOT_TAKEN"),
            RejectReason::BatchSlotTaken => write!(f, "BATCH_SLOT_TAKEN"),
            RejectReason::LabContiguity => write!(f, "LAB_CONTIGUITY"),
        }
    }
}

/// 单个请求的拒绝原因计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionTally {
    pub batch_daily_cap: u32,
    pub faculty_rest: u32,
    pub faculty_slot_taken: u32,
    pub batch_slot_taken: u32,
    pub lab_contiguity: u32,
}

impl RejectionTally {
    pub fn record(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::BatchDailyCap => self.batch_daily_cap += 1,
            RejectReason::FacultyRest => self.faculty_rest += 1,
            RejectReason::FacultySlotTaken => self.faculty_slot_taken += 1,
            RejectReason::BatchSlotTaken => self.batch_slot_taken += 1,
            RejectReason::LabContiguity => self.lab_contiguity += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.batch_daily_cap
            + self.faculty_rest
            + self.faculty_slot_taken
            + self.batch_slot_taken
            + self.lab_contiguity
    }
}

// ==========================================
// UnplacedRequest - 未排入请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedRequest {
    pub request_id: i64,
    pub subject_id: i64,
    pub batch_id: i64,
    pub faculty_id: i64,
    pub subject_name: String,
    pub batch_name: String,
    pub attempts: u32,
    pub reason: String,
    pub rejections: RejectionTally,
}

// ==========================================
// GenerationSummary - 单次排课结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub pass_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub requests_attempted: usize,
    pub placed: Vec<PlacementRecord>,
    pub unplaced: Vec<UnplacedRequest>,
    pub total_probes: u64,
}

impl GenerationSummary {
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// 所有请求是否全部排入
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}
