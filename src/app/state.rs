// ==========================================
// 课程排课系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use crate::api::{CatalogApi, TimetableApi};
use crate::config::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::{
    AssignmentRepository, BatchRepository, FacultyRepository, GenerationLockRepository,
    RoomRepository, SubjectRepository, TimeSlotRepository, TimetableRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 应用状态
///
/// 所有仓储共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,
    /// 基础数据API
    pub catalog_api: Arc<CatalogApi>,
    /// 课表API
    pub timetable_api: Arc<TimetableApi>,
    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并应用统一 PRAGMA
    /// 2. 建表（幂等）并写入固定节次
    /// 3. 初始化所有Repository与API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 基于已初始化的连接组装（测试使用）
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let batch_repo = Arc::new(BatchRepository::new(conn.clone()));
        let subject_repo = Arc::new(SubjectRepository::new(conn.clone()));
        let faculty_repo = Arc::new(FacultyRepository::new(conn.clone()));
        let room_repo = Arc::new(RoomRepository::new(conn.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::new(conn.clone()));
        let time_slot_repo = Arc::new(TimeSlotRepository::new(conn.clone()));
        let timetable_repo = Arc::new(TimetableRepository::new(conn.clone()));
        let lock_repo = Arc::new(GenerationLockRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let catalog_api = Arc::new(CatalogApi::new(
            batch_repo,
            subject_repo,
            faculty_repo,
            room_repo.clone(),
            assignment_repo.clone(),
            time_slot_repo,
        ));
        let timetable_api = Arc::new(TimetableApi::new(
            assignment_repo,
            room_repo,
            timetable_repo,
            config_manager.clone(),
            lock_repo,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            catalog_api,
            timetable_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 CLASS_TIMETABLE_DB_PATH, 其次为用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CLASS_TIMETABLE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./class_timetable.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("class-timetable");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("class_timetable.db");
        }
    }

    path.to_string_lossy().to_string()
}
