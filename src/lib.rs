// ==========================================
// 课程排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 周课表生成（6 天 × 6 节）与冲突校验
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排课规则与探测
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 排课选项
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RoomKind, RoomStrategy, SubjectKind};

// 领域实体
pub use domain::{
    AssignmentRequest, Batch, Faculty, GenerationSummary, PlacementRecord, Room, Subject,
    TimeSlot, TimetableEntry, TimetableFilter, UnplacedRequest,
};

// 引擎
pub use engine::{ConstraintChecker, RoomSelector, SchedulerError, TimetableScheduler};

// API
pub use api::{ApiError, CatalogApi, TimetableApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "课程排课系统";
