// ==========================================
// 课程排课系统 - 排课令牌仓储
// ==========================================
// 表: generation_lock (单行令牌, lock_name 主键)
// 红线: 同一数据库文件同一时刻只允许一个排课持有者
// 说明: 进程崩溃遗留的令牌超过 STALE_LOCK_MINUTES 后可被接管
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 排课令牌名
pub const GENERATION_LOCK_NAME: &str = "timetable_generation";

/// 遗留令牌可被接管的时长（分钟）
pub const STALE_LOCK_MINUTES: i64 = 10;

// ==========================================
// GenerationLockRepository - 排课令牌仓储
// ==========================================
pub struct GenerationLockRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GenerationLockRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 尝试获取排课令牌
    ///
    /// # 返回
    /// - Ok(true): 获取成功, 调用方必须在所有退出路径调用 release
    /// - Ok(false): 令牌被其他持有者占用
    pub fn try_acquire(&self, holder: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            DELETE FROM generation_lock
            WHERE lock_name = ?1
              AND locked_at < datetime('now', ?2)
            "#,
            params![GENERATION_LOCK_NAME, format!("-{} minutes", STALE_LOCK_MINUTES)],
        )?;

        let rows = conn.execute(
            "INSERT OR IGNORE INTO generation_lock (lock_name, holder) VALUES (?1, ?2)",
            params![GENERATION_LOCK_NAME, holder],
        )?;
        Ok(rows == 1)
    }

    /// 释放排课令牌（只释放自己持有的令牌）
    pub fn release(&self, holder: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM generation_lock WHERE lock_name = ?1 AND holder = ?2",
            params![GENERATION_LOCK_NAME, holder],
        )?;
        Ok(rows)
    }

    /// 当前持有者
    pub fn current_holder(&self) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let holder = conn
            .query_row(
                "SELECT holder FROM generation_lock WHERE lock_name = ?1",
                params![GENERATION_LOCK_NAME],
                |row| row.get(0),
            )
            .optional()?;
        Ok(holder)
    }
}
