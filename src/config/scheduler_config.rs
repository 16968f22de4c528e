// ==========================================
// 课程排课系统 - 排课配置读取 Trait
// ==========================================
// 职责: 定义排课引擎所需的配置读取接口（不包含实现）
// 红线: 探测次数上限与班级日上限是常量，不在此配置
// ==========================================

use crate::domain::types::RoomStrategy;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

// ==========================================
// SchedulerConfig - 单次排课使用的配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// 是否启用"教师同一节次互斥"增强规则（默认关闭，保持原有相邻节次规则）
    pub faculty_slot_exclusive: bool,
    /// 选房策略
    pub room_strategy: RoomStrategy,
    /// 随机种子（None 表示使用系统熵源）
    pub random_seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            faculty_slot_exclusive: false,
            room_strategy: RoomStrategy::FirstRoom,
            random_seed: None,
        }
    }
}

// ==========================================
// SchedulerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SchedulerConfigReader: Send + Sync {
    /// 是否启用教师同一节次互斥
    ///
    /// # 默认值
    /// - false
    async fn get_faculty_slot_exclusive(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// 选房策略
    ///
    /// # 默认值
    /// - FIRST_ROOM
    async fn get_room_strategy(&self) -> Result<RoomStrategy, Box<dyn Error + Send + Sync>>;

    /// 随机种子
    ///
    /// # 默认值
    /// - None
    async fn get_random_seed(&self) -> Result<Option<u64>, Box<dyn Error + Send + Sync>>;

    /// 组装完整配置快照
    async fn load_scheduler_config(&self) -> Result<SchedulerConfig, Box<dyn Error + Send + Sync>> {
        Ok(SchedulerConfig {
            faculty_slot_exclusive: self.get_faculty_slot_exclusive().await?,
            room_strategy: self.get_room_strategy().await?,
            random_seed: self.get_random_seed().await?,
        })
    }
}
