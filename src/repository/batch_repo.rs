// ==========================================
// 课程排课系统 - 班级数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::catalog::{Batch, NewBatch};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// BatchRepository - 班级仓储
// ==========================================
pub struct BatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BatchRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Batch> {
        Ok(Batch {
            id: row.get(0)?,
            name: row.get(1)?,
            year: row.get(2)?,
            semester: row.get(3)?,
            student_count: row.get(4)?,
        })
    }

    /// 新增班级
    ///
    /// # 返回
    /// - Ok(i64): 新班级ID
    /// - Err(UniqueConstraintViolation): 班级名称重复
    pub fn insert(&self, batch: &NewBatch) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO batch (name, year, semester, student_count) VALUES (?1, ?2, ?3, ?4)",
            params![batch.name, batch.year, batch.semester, batch.student_count],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Batch>> {
        let conn = self.get_conn()?;
        let batch = conn
            .query_row(
                "SELECT id, name, year, semester, student_count FROM batch WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(batch)
    }

    /// 查询全部班级（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Batch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, year, semester, student_count FROM batch ORDER BY name",
        )?;
        let batches = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Batch>>>()?;
        Ok(batches)
    }

    /// 删除班级
    ///
    /// 仍被排课映射或课表引用时返回外键约束错误
    pub fn delete(&self, id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM batch WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}
