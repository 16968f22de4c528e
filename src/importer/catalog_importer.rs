// ==========================================
// 课程排课系统 - 基础数据导入器
// ==========================================
// 流程: 解析 → 字段映射 → 引用解析 → 落库
// 行级错误: 记录到报告并跳过该行, 不中断整个文件
// 文件级错误: 直接返回 ImportError
// 解析与落库是阻塞操作, 放到 spawn_blocking 线程池执行
// ==========================================

use crate::domain::catalog::{NewBatch, NewFaculty, NewRoom, NewSubject};
use crate::domain::timetable::NewAssignment;
use crate::domain::types::{RoomKind, SubjectKind};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use crate::repository::{
    AssignmentRepository, BatchRepository, FacultyRepository, RepositoryError, RoomRepository,
    SubjectRepository,
};
use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn, Span};

// ==========================================
// CatalogKind - 导入文件类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Batches,
    Subjects,
    Faculty,
    Rooms,
    Assignments,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Batches => "batches",
            CatalogKind::Subjects => "subjects",
            CatalogKind::Faculty => "faculty",
            CatalogKind::Rooms => "rooms",
            CatalogKind::Assignments => "assignments",
        }
    }

    /// 各类别的必填列
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            CatalogKind::Batches => &["name", "year", "semester", "student_count"],
            CatalogKind::Subjects => &["name", "code", "type", "credits"],
            CatalogKind::Faculty => &["name"],
            CatalogKind::Rooms => &["name", "capacity"],
            CatalogKind::Assignments => &["subject_code", "batch_name", "faculty"],
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "batches" | "batch" => Ok(CatalogKind::Batches),
            "subjects" | "subject" => Ok(CatalogKind::Subjects),
            "faculty" | "faculties" => Ok(CatalogKind::Faculty),
            "rooms" | "room" | "classrooms" => Ok(CatalogKind::Rooms),
            "assignments" | "assignment" => Ok(CatalogKind::Assignments),
            other => Err(format!("未知导入类别: {}", other)),
        }
    }
}

// ==========================================
// 导入报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    /// 数据行号（表头之后从 1 开始）
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogImportReport {
    pub kind: CatalogKind,
    pub file: String,
    pub total_rows: usize,
    pub imported: usize,
    pub failures: Vec<RowFailure>,
}

impl CatalogImportReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ==========================================
// CatalogImporter - 基础数据导入器
// ==========================================
#[derive(Clone)]
pub struct CatalogImporter {
    batch_repo: Arc<BatchRepository>,
    subject_repo: Arc<SubjectRepository>,
    faculty_repo: Arc<FacultyRepository>,
    room_repo: Arc<RoomRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    parser: UniversalFileParser,
}

impl CatalogImporter {
    pub fn new(
        batch_repo: Arc<BatchRepository>,
        subject_repo: Arc<SubjectRepository>,
        faculty_repo: Arc<FacultyRepository>,
        room_repo: Arc<RoomRepository>,
        assignment_repo: Arc<AssignmentRepository>,
    ) -> Self {
        Self {
            batch_repo,
            subject_repo,
            faculty_repo,
            room_repo,
            assignment_repo,
            parser: UniversalFileParser,
        }
    }

    /// 导入单个文件
    #[instrument(skip_all, fields(kind = %kind))]
    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        kind: CatalogKind,
        file_path: P,
    ) -> ImportResult<CatalogImportReport> {
        let importer = self.clone();
        let path = file_path.as_ref().to_path_buf();
        let span = Span::current();

        tokio::task::spawn_blocking(move || {
            span.in_scope(|| importer.import_file_blocking(kind, &path))
        })
        .await
        .map_err(|e| ImportError::Other(anyhow::anyhow!("导入任务执行失败: {}", e)))?
    }

    fn import_file_blocking(
        &self,
        kind: CatalogKind,
        path: &Path,
    ) -> ImportResult<CatalogImportReport> {
        let file = path.display().to_string();
        info!(file = %file, "开始导入基础数据");

        let rows = self.parser.parse(path).map_err(|e| {
            error!(file = %file, error = %e, "文件解析失败");
            e
        })?;

        let mut report = CatalogImportReport {
            kind,
            file,
            total_rows: rows.len(),
            imported: 0,
            failures: Vec::new(),
        };

        for (idx, row) in rows.iter().enumerate() {
            let row_no = idx + 1;
            match self.import_row(kind, row, row_no) {
                Ok(()) => report.imported += 1,
                Err(e) => {
                    warn!(row = row_no, error = %e, "行导入失败");
                    report.failures.push(RowFailure {
                        row: row_no,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            total = report.total_rows,
            imported = report.imported,
            failed = report.failures.len(),
            "基础数据导入完成"
        );
        Ok(report)
    }

    /// 批量导入多个文件
    ///
    /// 实体文件在阻塞线程池上并发导入; 排课映射依赖实体, 在其后按顺序导入
    pub async fn import_many(
        &self,
        files: Vec<(CatalogKind, PathBuf)>,
    ) -> Vec<Result<CatalogImportReport, String>> {
        let (assignments, entities): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|(kind, _)| *kind == CatalogKind::Assignments);

        info!(
            entities = entities.len(),
            assignments = assignments.len(),
            "开始批量导入文件"
        );

        let tasks = entities.into_iter().map(|(kind, path)| async move {
            self.import_file(kind, &path)
                .await
                .map_err(|e| format!("文件 {} 导入失败: {}", path.display(), e))
        });
        let mut results = join_all(tasks).await;

        for (kind, path) in assignments {
            results.push(
                self.import_file(kind, &path)
                    .await
                    .map_err(|e| format!("文件 {} 导入失败: {}", path.display(), e)),
            );
        }

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );
        results
    }

    fn import_row(&self, kind: CatalogKind, row: &RawRecord, row_no: usize) -> ImportResult<()> {
        for column in kind.required_columns() {
            required(row, row_no, column)?;
        }

        let stored = match kind {
            CatalogKind::Batches => self.batch_repo.insert(&map_batch(row, row_no)?).map(|_| ()),
            CatalogKind::Subjects => {
                self.subject_repo.insert(&map_subject(row, row_no)?).map(|_| ())
            }
            CatalogKind::Faculty => self.faculty_repo.insert(&map_faculty(row)).map(|_| ()),
            CatalogKind::Rooms => self.room_repo.insert(&map_room(row, row_no)?).map(|_| ()),
            CatalogKind::Assignments => {
                let assignment = self.resolve_assignment(row, row_no)?;
                self.assignment_repo.insert(&assignment).map(|_| ())
            }
        };

        stored.map_err(|source| ImportError::Repository { row: row_no, source })
    }

    /// 按课程代码 / 班级名称 / 教师邮箱或姓名解析排课映射
    fn resolve_assignment(&self, row: &RawRecord, row_no: usize) -> ImportResult<NewAssignment> {
        let repo_err = |source: RepositoryError| ImportError::Repository { row: row_no, source };

        let code = required(row, row_no, "subject_code")?;
        let subject = self
            .subject_repo
            .find_by_code(code)
            .map_err(repo_err)?
            .ok_or_else(|| unresolved(row_no, "subject", code))?;

        let batch_name = required(row, row_no, "batch_name")?;
        let batch = self
            .batch_repo
            .list_all()
            .map_err(repo_err)?
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(batch_name))
            .ok_or_else(|| unresolved(row_no, "batch", batch_name))?;

        let faculty_key = required(row, row_no, "faculty")?;
        let faculty = self
            .faculty_repo
            .list_all()
            .map_err(repo_err)?
            .into_iter()
            .find(|f| {
                f.email
                    .as_deref()
                    .is_some_and(|email| email.eq_ignore_ascii_case(faculty_key))
                    || f.name.eq_ignore_ascii_case(faculty_key)
            })
            .ok_or_else(|| unresolved(row_no, "faculty", faculty_key))?;

        Ok(NewAssignment {
            subject_id: subject.id,
            batch_id: batch.id,
            faculty_id: faculty.id,
        })
    }
}

// ==========================================
// 字段映射
// ==========================================

fn required<'a>(row: &'a RawRecord, row_no: usize, column: &str) -> ImportResult<&'a str> {
    row.get(column)
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ImportError::MissingColumn {
            row: row_no,
            column: column.to_string(),
        })
}

fn optional(row: &RawRecord, column: &str) -> Option<String> {
    row.get(column).filter(|v| !v.is_empty()).cloned()
}

fn parse_field<T>(row: &RawRecord, row_no: usize, column: &str) -> ImportResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = required(row, row_no, column)?;
    raw.parse::<T>().map_err(|e| ImportError::TypeConversionError {
        row: row_no,
        field: column.to_string(),
        message: format!("'{}': {}", raw, e),
    })
}

fn unresolved(row_no: usize, entity: &str, key: &str) -> ImportError {
    ImportError::UnresolvedReference {
        row: row_no,
        entity: entity.to_string(),
        key: key.to_string(),
    }
}

fn map_batch(row: &RawRecord, row_no: usize) -> ImportResult<NewBatch> {
    Ok(NewBatch {
        name: required(row, row_no, "name")?.to_string(),
        year: parse_field(row, row_no, "year")?,
        semester: parse_field(row, row_no, "semester")?,
        student_count: parse_field(row, row_no, "student_count")?,
    })
}

fn map_subject(row: &RawRecord, row_no: usize) -> ImportResult<NewSubject> {
    Ok(NewSubject {
        name: required(row, row_no, "name")?.to_string(),
        code: required(row, row_no, "code")?.to_string(),
        kind: parse_field::<SubjectKind>(row, row_no, "type")?,
        credits: parse_field(row, row_no, "credits")?,
    })
}

fn map_faculty(row: &RawRecord) -> NewFaculty {
    NewFaculty {
        name: row.get("name").cloned().unwrap_or_default(),
        email: optional(row, "email"),
        phone: optional(row, "phone"),
        department: optional(row, "department"),
    }
}

fn map_room(row: &RawRecord, row_no: usize) -> ImportResult<NewRoom> {
    let kind = match optional(row, "type") {
        Some(raw) => raw.parse::<RoomKind>().map_err(|e| ImportError::TypeConversionError {
            row: row_no,
            field: "type".to_string(),
            message: e,
        })?,
        None => RoomKind::default(),
    };

    Ok(NewRoom {
        name: required(row, row_no, "name")?.to_string(),
        capacity: parse_field(row, row_no, "capacity")?,
        kind,
        building: optional(row, "building"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn test_catalog_kind_from_str() {
        assert_eq!("Batches".parse::<CatalogKind>(), Ok(CatalogKind::Batches));
        assert_eq!("faculty".parse::<CatalogKind>(), Ok(CatalogKind::Faculty));
        assert_eq!("classrooms".parse::<CatalogKind>(), Ok(CatalogKind::Rooms));
        assert!("timetable".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_map_subject_parses_kind_and_credits() {
        let subject = map_subject(
            &row(&[("name", "Networks Lab"), ("code", "CS391"), ("type", "LAB"), ("credits", "2")]),
            1,
        )
        .unwrap();
        assert_eq!(subject.kind, SubjectKind::Lab);
        assert_eq!(subject.credits, 2);
    }

    #[test]
    fn test_map_batch_reports_bad_number() {
        let err = map_batch(
            &row(&[
                ("name", "CSE-1A"),
                ("year", "twenty"),
                ("semester", "1"),
                ("student_count", "60"),
            ]),
            4,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::TypeConversionError { row: 4, ref field, .. } if field == "year"
        ));
    }

    #[test]
    fn test_map_room_defaults_kind_to_both() {
        let room = map_room(&row(&[("name", "LH-2"), ("capacity", "80")]), 1).unwrap();
        assert_eq!(room.kind, RoomKind::Both);
        assert!(room.building.is_none());
    }

    #[test]
    fn test_required_rejects_blank_cell() {
        let err = required(&row(&[("name", "")]), 2, "name").unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { row: 2, .. }));
    }
}
