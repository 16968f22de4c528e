// ==========================================
// 基础数据导入测试
// ==========================================
// 职责: CSV 文件 → 仓储 → 排课请求
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod catalog_import_test {
    use class_timetable::domain::{RoomKind, SubjectKind};
    use class_timetable::importer::{CatalogImporter, CatalogKind, ImportError};
    use class_timetable::repository::{
        AssignmentRepository, BatchRepository, FacultyRepository, RoomRepository,
        SubjectRepository,
    };
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    use crate::test_helpers::{create_test_db, open_shared};

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    struct Fixture {
        _db: NamedTempFile,
        importer: CatalogImporter,
        subjects: Arc<SubjectRepository>,
        rooms: Arc<RoomRepository>,
        assignments: Arc<AssignmentRepository>,
    }

    fn setup() -> Fixture {
        let (db, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        let batches = Arc::new(BatchRepository::new(conn.clone()));
        let subjects = Arc::new(SubjectRepository::new(conn.clone()));
        let faculty = Arc::new(FacultyRepository::new(conn.clone()));
        let rooms = Arc::new(RoomRepository::new(conn.clone()));
        let assignments = Arc::new(AssignmentRepository::new(conn));
        let importer = CatalogImporter::new(
            batches,
            subjects.clone(),
            faculty,
            rooms.clone(),
            assignments.clone(),
        );
        Fixture {
            _db: db,
            importer,
            subjects,
            rooms,
            assignments,
        }
    }

    #[tokio::test]
    async fn test_import_many_then_assignments_resolve_references() {
        let fx = setup();
        let batches = csv_file(&[
            "name,year,semester,student_count",
            "CSE-3A,3,5,62",
            "CSE-3B,3,5,58",
        ]);
        let subjects = csv_file(&[
            "name,code,type,credits",
            "Operating Systems,CS501,theory,4",
            "OS Lab,CS591,lab,2",
        ]);
        let faculty = csv_file(&[
            "name,email,department",
            "Dr. Kulkarni,kulkarni@college.edu,CSE",
            "Dr. Bose,,CSE",
        ]);
        let rooms = csv_file(&[
            "name,capacity,type,building",
            "LH-301,70,theory,Main",
            "LAB-2,40,lab,",
        ]);
        let assignments = csv_file(&[
            "subject_code,batch_name,faculty",
            "CS501,CSE-3A,kulkarni@college.edu",
            "CS591,CSE-3A,Dr. Bose",
            "CS501,cse-3b,KULKARNI@college.edu",
        ]);

        let results = fx
            .importer
            .import_many(vec![
                (CatalogKind::Assignments, assignments.path().to_path_buf()),
                (CatalogKind::Batches, batches.path().to_path_buf()),
                (CatalogKind::Subjects, subjects.path().to_path_buf()),
                (CatalogKind::Faculty, faculty.path().to_path_buf()),
                (CatalogKind::Rooms, rooms.path().to_path_buf()),
            ])
            .await;

        assert_eq!(results.len(), 5);
        for result in &results {
            let report = result.as_ref().unwrap();
            assert!(report.is_clean(), "{:?}", report.failures);
        }
        // 排课映射排在最后
        assert_eq!(results[4].as_ref().unwrap().kind, CatalogKind::Assignments);

        let requests = fx.assignments.list_requests().unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].subject_kind, SubjectKind::Lab);
        assert_eq!(requests[1].faculty_name, "Dr. Bose");
        assert_eq!(requests[2].batch_name, "CSE-3B");

        let lab_room = fx
            .rooms
            .list_all()
            .unwrap()
            .into_iter()
            .find(|r| r.name == "LAB-2")
            .unwrap();
        assert_eq!(lab_room.kind, RoomKind::Lab);
        assert!(lab_room.building.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_entity_files_import_in_parallel_on_shared_connection() {
        let fx = setup();
        let room_files: Vec<NamedTempFile> = (0..4)
            .map(|f| {
                let mut lines = vec!["name,capacity,type".to_string()];
                lines.extend((0..25).map(|r| format!("B{}-R{:02},{},theory", f, r, 30 + r)));
                let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
                csv_file(&refs)
            })
            .collect();

        let results = fx
            .importer
            .import_many(
                room_files
                    .iter()
                    .map(|f| (CatalogKind::Rooms, f.path().to_path_buf()))
                    .collect(),
            )
            .await;

        assert_eq!(results.len(), 4);
        for result in &results {
            let report = result.as_ref().unwrap();
            assert_eq!(report.imported, 25);
            assert!(report.is_clean());
        }
        assert_eq!(fx.rooms.list_all().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_bad_rows_are_reported_and_skipped() {
        let fx = setup();
        let subjects = csv_file(&[
            "name,code,type,credits",
            "Compilers,CS601,theory,4",
            "Mystery,CS602,seminar,2",
            "Graphics,CS603,theory,four",
            "Duplicate,CS601,theory,3",
            ",CS604,theory,3",
        ]);

        let report = fx
            .importer
            .import_file(CatalogKind::Subjects, subjects.path())
            .await
            .unwrap();

        assert_eq!(report.total_rows, 5);
        assert_eq!(report.imported, 1);
        let failed_rows: Vec<usize> = report.failures.iter().map(|f| f.row).collect();
        assert_eq!(failed_rows, vec![2, 3, 4, 5]);
        assert_eq!(fx.subjects.list_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_reference_is_a_row_failure() {
        let fx = setup();
        let assignments = csv_file(&["subject_code,batch_name,faculty", "CS999,CSE-9Z,Nobody"]);

        let report = fx
            .importer
            .import_file(CatalogKind::Assignments, assignments.path())
            .await
            .unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("CS999"));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_file_error() {
        let fx = setup();
        let err = fx
            .importer
            .import_file(CatalogKind::Rooms, "/nonexistent/rooms.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
