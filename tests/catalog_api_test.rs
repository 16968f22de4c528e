// ==========================================
// 基础数据 API 测试
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod catalog_api_test {
    use class_timetable::api::ApiError;
    use class_timetable::domain::{NewAssignment, RoomKind, SubjectKind};

    use crate::test_helpers::{
        create_test_app, new_batch, new_faculty, new_room, new_subject,
    };

    #[test]
    fn test_create_and_list_round_trip() {
        let (_temp, state) = create_test_app();
        let api = &state.catalog_api;

        let batch_id = api.create_batch(new_batch("IT-2A", 45)).unwrap();
        let subject_id = api.create_subject(new_subject("IT201", SubjectKind::Theory)).unwrap();
        let faculty_id = api.create_faculty(new_faculty("Dr. Menon")).unwrap();
        api.create_room(new_room("LH-9", 50, RoomKind::Both)).unwrap();
        let assignment_id = api
            .create_assignment(NewAssignment {
                subject_id,
                batch_id,
                faculty_id,
            })
            .unwrap();

        assert_eq!(api.list_batches().unwrap()[0].name, "IT-2A");
        assert_eq!(api.list_rooms().unwrap()[0].capacity, 50);
        let requests = api.list_assignments_by_batch(batch_id).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, assignment_id);
        assert_eq!(requests[0].batch_student_count, 45);

        api.delete_assignment(assignment_id).unwrap();
        assert!(api.list_assignments().unwrap().is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let (_temp, state) = create_test_app();
        let api = &state.catalog_api;

        let mut batch = new_batch("IT-2B", 40);
        batch.semester = 0;
        assert!(matches!(api.create_batch(batch), Err(ApiError::InvalidInput(_))));

        let mut subject = new_subject("IT202", SubjectKind::Lab);
        subject.credits = 0;
        assert!(matches!(api.create_subject(subject), Err(ApiError::InvalidInput(_))));

        assert!(matches!(
            api.create_room(new_room("  ", 40, RoomKind::Lab)),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            api.create_room(new_room("LAB-X", 0, RoomKind::Lab)),
            Err(ApiError::InvalidInput(_))
        ));

        let mut faculty = new_faculty("Dr. Das");
        faculty.email = Some("not-an-email".to_string());
        assert!(matches!(api.create_faculty(faculty), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicates_and_missing_references() {
        let (_temp, state) = create_test_app();
        let api = &state.catalog_api;

        let batch_id = api.create_batch(new_batch("IT-3A", 40)).unwrap();
        assert!(matches!(
            api.create_batch(new_batch("IT-3A", 40)),
            Err(ApiError::BusinessRuleViolation(_))
        ));

        let err = api
            .create_assignment(NewAssignment {
                subject_id: 404,
                batch_id,
                faculty_id: 1,
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        assert!(matches!(api.delete_room(77), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_delete_entities_and_referenced_rows_are_protected() {
        let (_temp, state) = create_test_app();
        let api = &state.catalog_api;

        let batch_id = api.create_batch(new_batch("ME-1A", 30)).unwrap();
        let subject_id = api.create_subject(new_subject("ME101", SubjectKind::Theory)).unwrap();
        let spare_subject = api.create_subject(new_subject("ME102", SubjectKind::Lab)).unwrap();
        let faculty_id = api.create_faculty(new_faculty("Dr. Iyer")).unwrap();
        let assignment_id = api
            .create_assignment(NewAssignment {
                subject_id,
                batch_id,
                faculty_id,
            })
            .unwrap();

        let codes: Vec<String> = api.list_subjects().unwrap().into_iter().map(|s| s.code).collect();
        assert_eq!(codes, vec!["ME101".to_string(), "ME102".to_string()]);

        // 被排课映射引用时拒绝删除
        assert!(matches!(
            api.delete_batch(batch_id),
            Err(ApiError::BusinessRuleViolation(_))
        ));
        assert!(matches!(
            api.delete_faculty(faculty_id),
            Err(ApiError::BusinessRuleViolation(_))
        ));

        api.delete_subject(spare_subject).unwrap();
        api.delete_assignment(assignment_id).unwrap();
        api.delete_subject(subject_id).unwrap();
        api.delete_batch(batch_id).unwrap();
        api.delete_faculty(faculty_id).unwrap();

        assert!(api.list_subjects().unwrap().is_empty());
        assert!(api.list_batches().unwrap().is_empty());
        assert!(api.list_faculty().unwrap().is_empty());
        assert!(matches!(api.delete_subject(subject_id), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_time_slots_are_seeded_in_order() {
        let (_temp, state) = create_test_app();
        let slots = state.catalog_api.list_time_slots().unwrap();
        let numbers: Vec<u8> = slots.iter().map(|s| s.slot_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(slots[0].start.format("%H:%M").to_string(), "10:45");
    }
}
