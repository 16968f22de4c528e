// ==========================================
// 课程排课系统 - 课程数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::catalog::{NewSubject, Subject};
use crate::domain::types::SubjectKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::text_conversion_error;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SubjectRepository - 课程仓储
// ==========================================
pub struct SubjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Subject> {
        let kind_raw: String = row.get(3)?;
        let kind = kind_raw
            .parse::<SubjectKind>()
            .map_err(|e| text_conversion_error(3, e))?;

        Ok(Subject {
            id: row.get(0)?,
            name: row.get(1)?,
            code: row.get(2)?,
            kind,
            credits: row.get(4)?,
        })
    }

    /// 新增课程
    ///
    /// # 返回
    /// - Ok(i64): 新课程ID
    /// - Err(UniqueConstraintViolation): 课程代码重复
    pub fn insert(&self, subject: &NewSubject) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO subject (name, code, type, credits) VALUES (?1, ?2, ?3, ?4)",
            params![subject.name, subject.code, subject.kind.as_str(), subject.credits],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Subject>> {
        let conn = self.get_conn()?;
        let subject = conn
            .query_row(
                "SELECT id, name, code, type, credits FROM subject WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(subject)
    }

    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Subject>> {
        let conn = self.get_conn()?;
        let subject = conn
            .query_row(
                "SELECT id, name, code, type, credits FROM subject WHERE code = ?1",
                params![code],
                Self::map_row,
            )
            .optional()?;
        Ok(subject)
    }

    /// 查询全部课程（按课程代码排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Subject>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, code, type, credits FROM subject ORDER BY code")?;
        let subjects = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Subject>>>()?;
        Ok(subjects)
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM subject WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};

    fn setup() -> SubjectRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        SubjectRepository::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_kind_round_trips_through_storage() {
        let repo = setup();
        let id = repo
            .insert(&NewSubject {
                name: "Operating Systems Lab".to_string(),
                code: "CS391".to_string(),
                kind: SubjectKind::Lab,
                credits: 2,
            })
            .unwrap();

        let subject = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(subject.kind, SubjectKind::Lab);
        assert_eq!(repo.find_by_code("CS391").unwrap().unwrap().id, id);
    }

    #[test]
    fn test_duplicate_code_is_rejected() {
        let repo = setup();
        let subject = NewSubject {
            name: "Algorithms".to_string(),
            code: "CS201".to_string(),
            kind: SubjectKind::Theory,
            credits: 4,
        };
        repo.insert(&subject).unwrap();
        assert!(matches!(
            repo.insert(&subject),
            Err(RepositoryError::UniqueConstraintViolation(_))
        ));
    }
}
