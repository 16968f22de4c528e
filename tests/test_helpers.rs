// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use class_timetable::app::AppState;
use class_timetable::db::{ensure_schema, open_sqlite_connection};
use class_timetable::domain::{NewAssignment, NewBatch, NewFaculty, NewRoom, NewSubject};
use class_timetable::domain::{RoomKind, SubjectKind};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试库的共享连接
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(open_sqlite_connection(db_path).unwrap()))
}

/// 创建临时库并组装 AppState
pub fn create_test_app() -> (NamedTempFile, AppState) {
    class_timetable::logging::init_test();
    let (temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    (temp_file, state)
}

pub fn new_batch(name: &str, student_count: i32) -> NewBatch {
    NewBatch {
        name: name.to_string(),
        year: 2,
        semester: 3,
        student_count,
    }
}

pub fn new_subject(code: &str, kind: SubjectKind) -> NewSubject {
    NewSubject {
        name: format!("Subject {}", code),
        code: code.to_string(),
        kind,
        credits: 3,
    }
}

pub fn new_faculty(name: &str) -> NewFaculty {
    NewFaculty {
        name: name.to_string(),
        email: None,
        phone: None,
        department: Some("CSE".to_string()),
    }
}

pub fn new_room(name: &str, capacity: i32, kind: RoomKind) -> NewRoom {
    NewRoom {
        name: name.to_string(),
        capacity,
        kind,
        building: None,
    }
}

/// 写入一个中等规模的基础数据集
///
/// - batches 个班级, 每个班级 subjects_per_batch 门课
/// - 每 5 门课中第 5 门为实验课
/// - 教师数 = faculty_count, 按轮转分配
///
/// # 返回
/// 排课映射数量
pub fn seed_catalog(
    state: &AppState,
    batches: usize,
    subjects_per_batch: usize,
    faculty_count: usize,
) -> usize {
    let api = &state.catalog_api;

    api.create_room(new_room("LH-101", 80, RoomKind::Theory)).unwrap();
    api.create_room(new_room("LAB-201", 80, RoomKind::Lab)).unwrap();

    let faculty_ids: Vec<i64> = (0..faculty_count)
        .map(|i| api.create_faculty(new_faculty(&format!("Faculty-{}", i))).unwrap())
        .collect();

    let mut count = 0;
    for b in 0..batches {
        let batch_id = api.create_batch(new_batch(&format!("CSE-{}", b), 60)).unwrap();
        for s in 0..subjects_per_batch {
            let kind = if s % 5 == 4 { SubjectKind::Lab } else { SubjectKind::Theory };
            let subject_id = api
                .create_subject(new_subject(&format!("CS{}{:02}", b, s), kind))
                .unwrap();
            let faculty_id = faculty_ids[(b * subjects_per_batch + s) % faculty_count];
            api.create_assignment(NewAssignment {
                subject_id,
                batch_id,
                faculty_id,
            })
            .unwrap();
            count += 1;
        }
    }
    count
}
