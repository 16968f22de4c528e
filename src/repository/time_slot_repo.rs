// ==========================================
// 课程排课系统 - 节次目录仓储
// ==========================================
// 节次目录由 db::ensure_schema 初始化，此处只读
// ==========================================

use crate::domain::catalog::TimeSlot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_time_column;
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct TimeSlotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimeSlotRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按节次顺序返回节次目录
    pub fn list_all(&self) -> RepositoryResult<Vec<TimeSlot>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT slot_number, start_time, end_time FROM time_slot ORDER BY slot_number",
        )?;
        let slots = stmt
            .query_map([], |row| {
                Ok(TimeSlot {
                    slot_number: row.get(0)?,
                    start: parse_time_column(row, 1)?,
                    end: parse_time_column(row, 2)?,
                })
            })?
            .collect::<SqliteResult<Vec<TimeSlot>>>()?;
        Ok(slots)
    }
}
