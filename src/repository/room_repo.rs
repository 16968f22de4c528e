// ==========================================
// 课程排课系统 - 教室数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::catalog::{NewRoom, Room};
use crate::domain::types::RoomKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::text_conversion_error;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// RoomRepository - 教室仓储
// ==========================================
pub struct RoomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RoomRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Room> {
        let kind_raw: String = row.get(3)?;
        let kind = kind_raw
            .parse::<RoomKind>()
            .map_err(|e| text_conversion_error(3, e))?;

        Ok(Room {
            id: row.get(0)?,
            name: row.get(1)?,
            capacity: row.get(2)?,
            kind,
            building: row.get(4)?,
        })
    }

    pub fn insert(&self, room: &NewRoom) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO classroom (name, capacity, type, building) VALUES (?1, ?2, ?3, ?4)",
            params![room.name, room.capacity, room.kind.as_str(), room.building],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;
        let room = conn
            .query_row(
                "SELECT id, name, capacity, type, building FROM classroom WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(room)
    }

    /// 查询教室清单
    ///
    /// 按 id 升序返回：排课时"第一间教室"即最早登记的教室
    pub fn list_all(&self) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, capacity, type, building FROM classroom ORDER BY id")?;
        let rooms = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Room>>>()?;
        Ok(rooms)
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM classroom WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};

    #[test]
    fn test_list_all_keeps_registration_order() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        let repo = RoomRepository::new(Arc::new(Mutex::new(conn)));

        let first = repo
            .insert(&NewRoom {
                name: "Z-Block 9".to_string(),
                capacity: 40,
                kind: RoomKind::Lab,
                building: Some("Z".to_string()),
            })
            .unwrap();
        repo.insert(&NewRoom {
            name: "A-Block 1".to_string(),
            capacity: 120,
            kind: RoomKind::Both,
            building: None,
        })
        .unwrap();

        let rooms = repo.list_all().unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id, first);
        assert_eq!(rooms[0].kind, RoomKind::Lab);
        assert_eq!(rooms[1].building, None);
    }
}
