// ==========================================
// 课程排课系统 - 排课映射数据仓储
// ==========================================
// 表: subject_batch (课程 + 班级 + 教师)
// 约束: 每门课程在每个班级只对应一位教师
// ==========================================

use crate::domain::timetable::{AssignmentRequest, NewAssignment};
use crate::domain::types::SubjectKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::text_conversion_error;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AssignmentRepository - 排课映射仓储
// ==========================================
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

const REQUEST_SELECT: &str = r#"
    SELECT
        sb.id, sb.subject_id, sb.batch_id, sb.faculty_id,
        s.type, s.credits, s.name,
        b.name, f.name, b.student_count
    FROM subject_batch sb
    JOIN subject s ON sb.subject_id = s.id
    JOIN batch b ON sb.batch_id = b.id
    JOIN faculty f ON sb.faculty_id = f.id
"#;

impl AssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_request(row: &Row<'_>) -> SqliteResult<AssignmentRequest> {
        let kind_raw: String = row.get(4)?;
        let subject_kind = kind_raw
            .parse::<SubjectKind>()
            .map_err(|e| text_conversion_error(4, e))?;

        Ok(AssignmentRequest {
            id: row.get(0)?,
            subject_id: row.get(1)?,
            batch_id: row.get(2)?,
            faculty_id: row.get(3)?,
            subject_kind,
            subject_credits: row.get(5)?,
            subject_name: row.get(6)?,
            batch_name: row.get(7)?,
            faculty_name: row.get(8)?,
            batch_student_count: row.get(9)?,
        })
    }

    /// 新增排课映射
    ///
    /// # 返回
    /// - Ok(i64): 映射ID
    /// - Err(UniqueConstraintViolation): 该班级已配置此课程
    /// - Err(ForeignKeyViolation): 课程/班级/教师不存在
    pub fn insert(&self, assignment: &NewAssignment) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO subject_batch (subject_id, batch_id, faculty_id) VALUES (?1, ?2, ?3)",
            params![assignment.subject_id, assignment.batch_id, assignment.faculty_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询全部排课请求（含课程类型与名称快照）
    ///
    /// 按映射ID升序返回，即排课引擎的处理顺序
    pub fn list_requests(&self) -> RepositoryResult<Vec<AssignmentRequest>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY sb.id", REQUEST_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let requests = stmt
            .query_map([], Self::map_request)?
            .collect::<SqliteResult<Vec<AssignmentRequest>>>()?;
        Ok(requests)
    }

    /// 按班级查询排课请求
    pub fn list_requests_by_batch(
        &self,
        batch_id: i64,
    ) -> RepositoryResult<Vec<AssignmentRequest>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE sb.batch_id = ?1 ORDER BY sb.id", REQUEST_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let requests = stmt
            .query_map(params![batch_id], Self::map_request)?
            .collect::<SqliteResult<Vec<AssignmentRequest>>>()?;
        Ok(requests)
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM subject_batch WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}
