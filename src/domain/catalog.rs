// ==========================================
// 课程排课系统 - 基础档案领域模型
// ==========================================
// 实体: 班级 / 课程 / 教师 / 教室 / 节次
// 红线: 档案由外部维护, 排课引擎只读
// ==========================================

use crate::domain::types::{RoomKind, SlotNumber, SubjectKind};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Batch - 班级
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: i64,            // 班级ID
    pub name: String,       // 班级名称 (唯一)
    pub year: i32,          // 年级
    pub semester: i32,      // 学期
    pub student_count: i32, // 学生人数
}

// ==========================================
// Subject - 课程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,           // 课程ID
    pub name: String,      // 课程名称
    pub code: String,      // 课程代码 (唯一)
    pub kind: SubjectKind, // 理论 / 实验
    pub credits: i32,      // 学分
}

// ==========================================
// Faculty - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

// ==========================================
// Room - 教室
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub kind: RoomKind,
    pub building: Option<String>,
}

// ==========================================
// TimeSlot - 节次
// ==========================================
// 固定目录: 每日 6 节, 按 slot_number 排序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_number: SlotNumber,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// 默认节次目录 (slot_number, 开始, 结束)
pub const DEFAULT_TIME_SLOTS: [(SlotNumber, &str, &str); 6] = [
    (1, "10:45", "11:45"),
    (2, "11:45", "12:45"),
    (3, "12:45", "13:45"),
    (4, "14:15", "15:15"),
    (5, "15:15", "16:15"),
    (6, "16:15", "17:30"),
];

/// 新建档案输入（无ID，由数据库分配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatch {
    pub name: String,
    pub year: i32,
    pub semester: i32,
    pub student_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
    pub code: String,
    pub kind: SubjectKind,
    pub credits: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFaculty {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub capacity: i32,
    pub kind: RoomKind,
    pub building: Option<String>,
}
