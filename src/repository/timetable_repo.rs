// ==========================================
// 课程排课系统 - 课表数据仓储
// ==========================================
// 表: timetable (落位记录)
// 红线: 实验课只写一行（起始节次 + duration=2）
// ==========================================

use crate::domain::timetable::{NewPlacement, PlacementRecord, TimetableEntry, TimetableFilter};
use crate::domain::types::SubjectKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{parse_time_column, text_conversion_error};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// TimetableRepository - 课表仓储
// ==========================================
pub struct TimetableRepository {
    conn: Arc<Mutex<Connection>>,
}

const ENTRY_SELECT: &str = r#"
    SELECT
        t.id, t.day_of_week, t.slot_number, t.duration,
        ts.start_time, ts.end_time,
        t.batch_id, b.name,
        t.subject_id, s.name, s.code, s.type,
        t.faculty_id, f.name,
        t.classroom_id, c.name
    FROM timetable t
    JOIN subject s ON t.subject_id = s.id
    JOIN batch b ON t.batch_id = b.id
    JOIN faculty f ON t.faculty_id = f.id
    JOIN classroom c ON t.classroom_id = c.id
    JOIN time_slot ts ON t.slot_number = ts.slot_number
"#;

impl TimetableRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_record(row: &Row<'_>) -> SqliteResult<PlacementRecord> {
        Ok(PlacementRecord {
            id: row.get(0)?,
            batch_id: row.get(1)?,
            subject_id: row.get(2)?,
            faculty_id: row.get(3)?,
            room_id: row.get(4)?,
            day: row.get(5)?,
            slot_number: row.get(6)?,
            duration: row.get(7)?,
        })
    }

    fn map_entry(row: &Row<'_>) -> SqliteResult<TimetableEntry> {
        let kind_raw: String = row.get(11)?;
        let subject_kind = kind_raw
            .parse::<SubjectKind>()
            .map_err(|e| text_conversion_error(11, e))?;

        Ok(TimetableEntry {
            id: row.get(0)?,
            day: row.get(1)?,
            slot_number: row.get(2)?,
            duration: row.get(3)?,
            start_time: parse_time_column(row, 4)?,
            end_time: parse_time_column(row, 5)?,
            batch_id: row.get(6)?,
            batch_name: row.get(7)?,
            subject_id: row.get(8)?,
            subject_name: row.get(9)?,
            subject_code: row.get(10)?,
            subject_kind,
            faculty_id: row.get(12)?,
            faculty_name: row.get(13)?,
            room_id: row.get(14)?,
            room_name: row.get(15)?,
        })
    }

    /// 清空全部落位记录
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM timetable", [])?;
        Ok(affected)
    }

    /// 写入单条落位记录
    pub fn insert(&self, placement: &NewPlacement) -> RepositoryResult<PlacementRecord> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO timetable (
                batch_id, subject_id, faculty_id, classroom_id,
                day_of_week, slot_number, duration
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                placement.batch_id,
                placement.subject_id,
                placement.faculty_id,
                placement.room_id,
                placement.day,
                placement.slot_number,
                placement.duration,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(placement.clone().into_record(id))
    }

    /// 查询全部落位记录（原始行，按 day/slot 排序）
    pub fn list_records(&self) -> RepositoryResult<Vec<PlacementRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, batch_id, subject_id, faculty_id, classroom_id,
                   day_of_week, slot_number, duration
            FROM timetable
            ORDER BY day_of_week, slot_number, id
            "#,
        )?;
        let records = stmt
            .query_map([], Self::map_record)?
            .collect::<SqliteResult<Vec<PlacementRecord>>>()?;
        Ok(records)
    }

    /// 查询课表视图
    ///
    /// # 参数
    /// - filter: 全部 / 按班级 / 按教师
    ///
    /// # 返回
    /// 按 (day, slot_number) 排序的课表行
    pub fn list_entries(&self, filter: TimetableFilter) -> RepositoryResult<Vec<TimetableEntry>> {
        let conn = self.get_conn()?;
        let order = " ORDER BY t.day_of_week, t.slot_number, t.id";

        let entries = match filter {
            TimetableFilter::All => {
                let sql = format!("{}{}", ENTRY_SELECT, order);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], Self::map_entry)?
                    .collect::<SqliteResult<Vec<TimetableEntry>>>()?;
                rows
            }
            TimetableFilter::Batch(batch_id) => {
                let sql = format!("{} WHERE t.batch_id = ?1{}", ENTRY_SELECT, order);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![batch_id], Self::map_entry)?
                    .collect::<SqliteResult<Vec<TimetableEntry>>>()?;
                rows
            }
            TimetableFilter::Faculty(faculty_id) => {
                let sql = format!("{} WHERE t.faculty_id = ?1{}", ENTRY_SELECT, order);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![faculty_id], Self::map_entry)?
                    .collect::<SqliteResult<Vec<TimetableEntry>>>()?;
                rows
            }
        };

        Ok(entries)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM timetable", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
