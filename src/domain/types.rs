// ==========================================
// 课程排课系统 - 领域类型定义
// ==========================================
// 课表网格: 每周 6 个教学日, 每日 6 个固定节次
// 序列化格式: 小写 (与数据库 CHECK 约束一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 教学日编号 (1..=DAYS_PER_WEEK)
pub type Day = u8;

/// 节次编号 (1..=SLOTS_PER_DAY)
pub type SlotNumber = u8;

/// 每周教学日数
pub const DAYS_PER_WEEK: Day = 6;

/// 每日节次数
pub const SLOTS_PER_DAY: SlotNumber = 6;

/// 同一班级单日最多排课数（硬上限，不可配置）
pub const MAX_DAILY_CLASSES_PER_BATCH: u32 = 4;

/// 单个排课请求的最大随机探测次数
pub const MAX_PROBE_ATTEMPTS: u32 = 100;

/// 教学日是否合法
pub fn is_valid_day(day: Day) -> bool {
    (1..=DAYS_PER_WEEK).contains(&day)
}

/// 节次是否合法
pub fn is_valid_slot(slot: SlotNumber) -> bool {
    (1..=SLOTS_PER_DAY).contains(&slot)
}

// ==========================================
// 课程类型 (Subject Kind)
// ==========================================
// 实验课占用连续两节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Theory, // 理论课
    Lab,    // 实验课
}

impl SubjectKind {
    /// 单次课占用的节数
    pub fn duration(&self) -> u8 {
        match self {
            SubjectKind::Theory => 1,
            SubjectKind::Lab => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Theory => "theory",
            SubjectKind::Lab => "lab",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theory" => Ok(SubjectKind::Theory),
            "lab" => Ok(SubjectKind::Lab),
            other => Err(format!("未知课程类型: {}", other)),
        }
    }
}

// ==========================================
// 教室类型 (Room Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Theory, // 普通教室
    Lab,    // 实验室
    Both,   // 通用
}

impl RoomKind {
    /// 教室是否能承接该类型课程
    pub fn supports(&self, kind: SubjectKind) -> bool {
        match self {
            RoomKind::Both => true,
            RoomKind::Theory => kind == SubjectKind::Theory,
            RoomKind::Lab => kind == SubjectKind::Lab,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Theory => "theory",
            RoomKind::Lab => "lab",
            RoomKind::Both => "both",
        }
    }
}

impl Default for RoomKind {
    fn default() -> Self {
        RoomKind::Both
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoomKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theory" => Ok(RoomKind::Theory),
            "lab" => Ok(RoomKind::Lab),
            "both" | "" => Ok(RoomKind::Both),
            other => Err(format!("未知教室类型: {}", other)),
        }
    }
}

// ==========================================
// 选房策略 (Room Strategy)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与 config_kv 一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStrategy {
    FirstRoom, // 始终使用教室清单第一项
    KindAware, // 按类型与容量匹配
}

impl fmt::Display for RoomStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomStrategy::FirstRoom => write!(f, "FIRST_ROOM"),
            RoomStrategy::KindAware => write!(f, "KIND_AWARE"),
        }
    }
}

impl FromStr for RoomStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIRST_ROOM" => Ok(RoomStrategy::FirstRoom),
            "KIND_AWARE" => Ok(RoomStrategy::KindAware),
            other => Err(format!("未知选房策略: {}", other)),
        }
    }
}
