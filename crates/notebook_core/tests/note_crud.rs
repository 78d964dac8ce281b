use chrono::{Duration, NaiveDate, NaiveDateTime};
use notebook_core::db::open_db_in_memory;
use notebook_core::{
    InMemoryNoteRepository, Note, NoteRepository, NoteSelector, NoteService, NoteServiceError,
    NoteValidationError, Relation, SqliteNoteRepository,
};

fn day(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .unwrap()
}

fn by_id(id: i64) -> NoteSelector {
    NoteSelector::builder()
        .add_id(id)
        .set_id_relation(Relation::Equals)
        .build()
}

#[test]
fn create_assigns_ids_and_get_reassembles_dates_in_order() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let note = Note::with_dates(
        "Dentist",
        "Bring the insurance card",
        2,
        vec![day(10, 9), day(3, 9)],
        vec![day(9, 18), day(10, 7), day(9, 18)],
    );
    let first_id = service.create_note(&note).unwrap();
    let second_id = service.create_note(&Note::new("Plain", "", 1)).unwrap();
    assert!(second_id > first_id);

    let fetched = service.get_notes(&by_id(first_id)).unwrap();
    let mut expected = note.clone();
    expected.id = Some(first_id);
    assert_eq!(fetched, vec![expected]);
}

#[test]
fn notes_without_dates_are_retrievable() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let id = service.create_note(&Note::new("Someday", "", 0)).unwrap();
    let all = service.get_notes(&NoteSelector::empty()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, Some(id));
    assert!(all[0].execution_dates.is_empty());
    assert!(all[0].reminder_dates.is_empty());
}

#[test]
fn update_replaces_content_and_both_date_lists() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let id = service
        .create_note(&Note::with_dates(
            "Draft",
            "v1",
            1,
            vec![day(1, 8), day(2, 8)],
            vec![day(1, 7)],
        ))
        .unwrap();

    let mut updated = Note::with_dates("Final", "v2", 4, vec![day(5, 8)], Vec::new());
    updated.id = Some(id);
    assert_eq!(service.update_note(&updated).unwrap(), 1);

    let fetched = service.get_notes(&by_id(id)).unwrap();
    assert_eq!(fetched, vec![updated]);
}

#[test]
fn update_of_missing_note_is_not_found_and_leaves_store_untouched() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    service.create_note(&Note::new("Kept", "", 0)).unwrap();

    let mut ghost = Note::with_dates("Ghost", "", 0, vec![day(1, 1)], Vec::new());
    ghost.id = Some(404);
    let err = service.update_note(&ghost).unwrap_err();
    assert!(matches!(err, NoteServiceError::NotFound(404)));

    drop(service);
    let orphans: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM execution_dates WHERE note_id = 404;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn delete_removes_selected_notes_and_their_dates() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);
        for priority in 0..5 {
            service
                .create_note(&Note::with_dates(
                    "Task",
                    "",
                    priority,
                    vec![day(1, 8)],
                    vec![day(1, 7)],
                ))
                .unwrap();
        }

        let high = NoteSelector::builder()
            .set_priority(3)
            .set_priority_relation(Relation::GreaterEquals)
            .build();
        assert_eq!(service.delete_notes(&high).unwrap(), 2);

        let remaining = service.get_notes(&NoteSelector::empty()).unwrap();
        assert_eq!(
            remaining.iter().map(|note| note.priority).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(service.delete_notes(&high).unwrap(), 0);
    }

    let dates: i64 = conn
        .query_row("SELECT COUNT(*) FROM reminder_dates;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(dates, 3);
}

#[test]
fn membership_selector_selects_every_listed_id() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    for index in 0..4 {
        service
            .create_note(&Note::new(format!("n{index}"), "", index))
            .unwrap();
    }

    let selector = NoteSelector::builder()
        .add_ids([4, 2])
        .set_id_relation(Relation::In)
        .build();
    let fetched = service.get_notes(&selector).unwrap();
    assert_eq!(
        fetched.iter().filter_map(|note| note.id).collect::<Vec<_>>(),
        vec![2, 4]
    );
}

#[test]
fn sorted_listing_orders_by_first_execution_date() {
    let mut service = NoteService::new(InMemoryNoteRepository::new());
    service
        .create_note(&Note::with_dates("late", "", 0, vec![day(20, 0)], Vec::new()))
        .unwrap();
    service.create_note(&Note::new("undated", "", 0)).unwrap();
    service
        .create_note(&Note::with_dates("early", "", 0, vec![day(2, 0)], Vec::new()))
        .unwrap();

    let sorted = service
        .get_notes_sorted_by_execution(&NoteSelector::empty())
        .unwrap();
    let headlines: Vec<&str> = sorted.iter().map(|note| note.headline.as_str()).collect();
    assert_eq!(headlines, vec!["early", "late", "undated"]);
}

#[test]
fn in_memory_and_sqlite_repositories_assign_same_ids() {
    let mut conn = open_db_in_memory().unwrap();
    let mut sqlite = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut memory = InMemoryNoteRepository::new();

    for index in 0..3 {
        let note = Note::with_dates(format!("n{index}"), "", index, vec![day(1, 1)], Vec::new());
        assert_eq!(
            sqlite.create_note(&note).unwrap(),
            memory.create_note(&note).unwrap()
        );
    }
    assert_eq!(
        sqlite.get_notes(&NoteSelector::empty()).unwrap(),
        memory.get_notes(&NoteSelector::empty()).unwrap()
    );

    let selector = by_id(2);
    assert_eq!(sqlite.delete_notes(&selector).unwrap(), 1);
    assert_eq!(memory.delete_notes(&selector).unwrap(), 1);
    assert_eq!(memory.len(), 2);
}

#[test]
fn overlong_headline_is_rejected() {
    let mut service = NoteService::new(InMemoryNoteRepository::new());
    let err = service
        .create_note(&Note::new("h".repeat(151), "", 0))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::Validation(_)));
}

#[test]
fn nanosecond_dates_survive_create_and_get() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let precise = Note::with_dates(
        "Launch",
        "",
        3,
        vec![day(12, 12) + Duration::nanoseconds(500_123)],
        vec![day(12, 11) + Duration::nanoseconds(999_999_999)],
    );
    let id = service.create_note(&precise).unwrap();

    let mut expected = precise;
    expected.id = Some(id);
    assert_eq!(service.get_notes(&by_id(id)).unwrap(), vec![expected]);

    let after_noon = NoteSelector::builder()
        .set_date(day(12, 12))
        .set_date_relation(Relation::After)
        .build();
    assert_eq!(service.get_notes(&after_noon).unwrap().len(), 1);
}

#[test]
fn dates_beyond_storable_range_are_rejected_by_both_repositories() {
    let far = NaiveDate::from_ymd_opt(2400, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap();
    let note = Note::with_dates("Far", "", 0, vec![far], Vec::new());

    let mut conn = open_db_in_memory().unwrap();
    let mut sqlite = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    let mut memory = NoteService::new(InMemoryNoteRepository::new());
    for err in [
        sqlite.create_note(&note).unwrap_err(),
        memory.create_note(&note).unwrap_err(),
    ] {
        assert!(matches!(
            err,
            NoteServiceError::Validation(NoteValidationError::DateOutOfRange(date)) if date == far
        ));
    }

    let beyond = NoteSelector::builder()
        .set_date(far)
        .set_date_relation(Relation::Before)
        .build();
    assert!(matches!(
        sqlite.get_notes(&beyond),
        Err(NoteServiceError::Selector(_))
    ));
    assert!(matches!(
        memory.get_notes(&beyond),
        Err(NoteServiceError::Selector(_))
    ));
}
