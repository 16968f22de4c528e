// ==========================================
// 课程排课系统 - 基础数据 API
// ==========================================
// 职责: 班级 / 课程 / 教师 / 教室 / 排课映射的增删查
// 校验: 名称非空, 容量/学分/人数为正, 学期 ≥ 1
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::catalog::{
    Batch, Faculty, NewBatch, NewFaculty, NewRoom, NewSubject, Room, Subject, TimeSlot,
};
use crate::domain::timetable::{AssignmentRequest, NewAssignment};
use crate::importer::{CatalogImportReport, CatalogImporter, CatalogKind};
use crate::repository::{
    AssignmentRepository, BatchRepository, FacultyRepository, RoomRepository, SubjectRepository,
    TimeSlotRepository,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

// ==========================================
// CatalogApi - 基础数据 API
// ==========================================
pub struct CatalogApi {
    batch_repo: Arc<BatchRepository>,
    subject_repo: Arc<SubjectRepository>,
    faculty_repo: Arc<FacultyRepository>,
    room_repo: Arc<RoomRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    time_slot_repo: Arc<TimeSlotRepository>,
    importer: CatalogImporter,
}

impl CatalogApi {
    pub fn new(
        batch_repo: Arc<BatchRepository>,
        subject_repo: Arc<SubjectRepository>,
        faculty_repo: Arc<FacultyRepository>,
        room_repo: Arc<RoomRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        time_slot_repo: Arc<TimeSlotRepository>,
    ) -> Self {
        let importer = CatalogImporter::new(
            batch_repo.clone(),
            subject_repo.clone(),
            faculty_repo.clone(),
            room_repo.clone(),
            assignment_repo.clone(),
        );
        Self {
            batch_repo,
            subject_repo,
            faculty_repo,
            room_repo,
            assignment_repo,
            time_slot_repo,
            importer,
        }
    }

    // ==========================================
    // 班级
    // ==========================================

    pub fn create_batch(&self, batch: NewBatch) -> ApiResult<i64> {
        require_name("name", &batch.name)?;
        require_positive("semester", batch.semester)?;
        require_positive("student_count", batch.student_count)?;
        let id = self.batch_repo.insert(&batch)?;
        info!(batch_id = id, name = %batch.name, "新增班级");
        Ok(id)
    }

    pub fn list_batches(&self) -> ApiResult<Vec<Batch>> {
        Ok(self.batch_repo.list_all()?)
    }

    pub fn delete_batch(&self, id: i64) -> ApiResult<()> {
        ensure_deleted("Batch", id, self.batch_repo.delete(id)?)
    }

    // ==========================================
    // 课程
    // ==========================================

    pub fn create_subject(&self, subject: NewSubject) -> ApiResult<i64> {
        require_name("name", &subject.name)?;
        require_name("code", &subject.code)?;
        require_positive("credits", subject.credits)?;
        let id = self.subject_repo.insert(&subject)?;
        info!(subject_id = id, code = %subject.code, kind = %subject.kind, "新增课程");
        Ok(id)
    }

    pub fn list_subjects(&self) -> ApiResult<Vec<Subject>> {
        Ok(self.subject_repo.list_all()?)
    }

    pub fn delete_subject(&self, id: i64) -> ApiResult<()> {
        ensure_deleted("Subject", id, self.subject_repo.delete(id)?)
    }

    // ==========================================
    // 教师
    // ==========================================

    pub fn create_faculty(&self, faculty: NewFaculty) -> ApiResult<i64> {
        require_name("name", &faculty.name)?;
        if let Some(email) = faculty.email.as_deref() {
            if !email.contains('@') {
                return Err(ApiError::InvalidInput(format!("邮箱格式错误: {}", email)));
            }
        }
        let id = self.faculty_repo.insert(&faculty)?;
        info!(faculty_id = id, name = %faculty.name, "新增教师");
        Ok(id)
    }

    pub fn list_faculty(&self) -> ApiResult<Vec<Faculty>> {
        Ok(self.faculty_repo.list_all()?)
    }

    pub fn delete_faculty(&self, id: i64) -> ApiResult<()> {
        ensure_deleted("Faculty", id, self.faculty_repo.delete(id)?)
    }

    // ==========================================
    // 教室
    // ==========================================

    pub fn create_room(&self, room: NewRoom) -> ApiResult<i64> {
        require_name("name", &room.name)?;
        require_positive("capacity", room.capacity)?;
        let id = self.room_repo.insert(&room)?;
        info!(room_id = id, name = %room.name, "新增教室");
        Ok(id)
    }

    pub fn list_rooms(&self) -> ApiResult<Vec<Room>> {
        Ok(self.room_repo.list_all()?)
    }

    pub fn delete_room(&self, id: i64) -> ApiResult<()> {
        ensure_deleted("Room", id, self.room_repo.delete(id)?)
    }

    // ==========================================
    // 排课映射
    // ==========================================

    /// 新增排课映射（课程 + 班级 + 教师须已存在）
    pub fn create_assignment(&self, assignment: NewAssignment) -> ApiResult<i64> {
        if self.subject_repo.find_by_id(assignment.subject_id)?.is_none() {
            return Err(not_found("Subject", assignment.subject_id));
        }
        if self.batch_repo.find_by_id(assignment.batch_id)?.is_none() {
            return Err(not_found("Batch", assignment.batch_id));
        }
        if self.faculty_repo.find_by_id(assignment.faculty_id)?.is_none() {
            return Err(not_found("Faculty", assignment.faculty_id));
        }
        let id = self.assignment_repo.insert(&assignment)?;
        info!(
            assignment_id = id,
            subject_id = assignment.subject_id,
            batch_id = assignment.batch_id,
            faculty_id = assignment.faculty_id,
            "新增排课映射"
        );
        Ok(id)
    }

    pub fn list_assignments(&self) -> ApiResult<Vec<AssignmentRequest>> {
        Ok(self.assignment_repo.list_requests()?)
    }

    pub fn list_assignments_by_batch(&self, batch_id: i64) -> ApiResult<Vec<AssignmentRequest>> {
        Ok(self.assignment_repo.list_requests_by_batch(batch_id)?)
    }

    pub fn delete_assignment(&self, id: i64) -> ApiResult<()> {
        ensure_deleted("Assignment", id, self.assignment_repo.delete(id)?)
    }

    // ==========================================
    // 节次 / 导入
    // ==========================================

    pub fn list_time_slots(&self) -> ApiResult<Vec<TimeSlot>> {
        Ok(self.time_slot_repo.list_all()?)
    }

    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        kind: CatalogKind,
        file_path: P,
    ) -> ApiResult<CatalogImportReport> {
        Ok(self.importer.import_file(kind, file_path).await?)
    }
}

fn require_name(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} 不能为空", field)));
    }
    Ok(())
}

fn require_positive(field: &str, value: i32) -> ApiResult<()> {
    if value < 1 {
        return Err(ApiError::InvalidInput(format!("{} 必须为正数, 实际 {}", field, value)));
    }
    Ok(())
}

fn not_found(entity: &str, id: i64) -> ApiError {
    ApiError::NotFound(format!("{}(id={})不存在", entity, id))
}

fn ensure_deleted(entity: &str, id: i64, affected: usize) -> ApiResult<()> {
    if affected == 0 {
        return Err(not_found(entity, id));
    }
    Ok(())
}
