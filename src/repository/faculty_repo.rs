// ==========================================
// 课程排课系统 - 教师数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::catalog::{Faculty, NewFaculty};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// FacultyRepository - 教师仓储
// ==========================================
pub struct FacultyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FacultyRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Faculty> {
        Ok(Faculty {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            department: row.get(4)?,
        })
    }

    /// 新增教师
    ///
    /// email 可为空；非空时必须唯一
    pub fn insert(&self, faculty: &NewFaculty) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO faculty (name, email, phone, department) VALUES (?1, ?2, ?3, ?4)",
            params![faculty.name, faculty.email, faculty.phone, faculty.department],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Faculty>> {
        let conn = self.get_conn()?;
        let faculty = conn
            .query_row(
                "SELECT id, name, email, phone, department FROM faculty WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(faculty)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Faculty>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, department FROM faculty ORDER BY name, id",
        )?;
        let rows = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Faculty>>>()?;
        Ok(rows)
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM faculty WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}
