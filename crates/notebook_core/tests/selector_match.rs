use chrono::{Duration, NaiveDate, NaiveDateTime};
use notebook_core::{match_notes, Note, NoteId, NoteSelector, Relation, SelectorError};

fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap()
}

fn note(id: NoteId, priority: i32, execution_dates: Vec<NaiveDateTime>) -> Note {
    let mut note = Note::with_dates(format!("note {id}"), "", priority, execution_dates, Vec::new());
    note.id = Some(id);
    note
}

fn ids(notes: &[Note]) -> Vec<NoteId> {
    notes.iter().filter_map(|note| note.id).collect()
}

fn sample_notes() -> Vec<Note> {
    let t = reference_time();
    vec![
        note(1, 3, vec![t - Duration::hours(1)]),
        note(2, 9, vec![t + Duration::hours(1)]),
        note(3, 1, vec![t - Duration::hours(2)]),
    ]
}

#[test]
fn priority_and_date_scenario_selects_expected_notes() {
    let selector = NoteSelector::builder()
        .set_priority(5)
        .set_priority_relation(Relation::LessEquals)
        .set_date(reference_time())
        .set_date_relation(Relation::Before)
        .build();

    let matched = match_notes(&selector, &sample_notes()).unwrap();
    assert_eq!(ids(&matched), vec![1, 3]);
}

#[test]
fn unconstrained_selector_returns_input_unchanged() {
    let notes = sample_notes();
    let matched = match_notes(&NoteSelector::empty(), &notes).unwrap();
    assert_eq!(matched, notes);
}

#[test]
fn id_relations_compare_against_first_id() {
    let notes = sample_notes();
    let cases = [
        (Relation::Equals, vec![2]),
        (Relation::Greater, vec![3]),
        (Relation::GreaterEquals, vec![2, 3]),
        (Relation::Less, vec![1]),
        (Relation::LessEquals, vec![1, 2]),
        (Relation::In, vec![2]),
    ];
    for (relation, expected) in cases {
        let selector = NoteSelector::builder()
            .add_id(2)
            .set_id_relation(relation)
            .build();
        assert_eq!(
            ids(&match_notes(&selector, &notes).unwrap()),
            expected,
            "relation {relation:?}"
        );
    }
}

#[test]
fn membership_uses_full_id_set_and_keeps_input_order() {
    let mut notes = sample_notes();
    notes.reverse();
    let selector = NoteSelector::builder()
        .add_ids([1, 3, 3, 99])
        .set_id_relation(Relation::In)
        .build();
    assert_eq!(ids(&match_notes(&selector, &notes).unwrap()), vec![3, 1]);
}

#[test]
fn date_relations_use_first_execution_date_only() {
    let t = reference_time();
    let notes = vec![
        note(1, 0, vec![t, t - Duration::days(1)]),
        note(2, 0, vec![t + Duration::minutes(1), t]),
    ];
    let cases = [
        (Relation::Equals, vec![1]),
        (Relation::After, vec![2]),
        (Relation::Greater, vec![2]),
        (Relation::Before, vec![]),
        (Relation::Less, vec![]),
        (Relation::GreaterEquals, vec![1, 2]),
        (Relation::LessEquals, vec![1]),
    ];
    for (relation, expected) in cases {
        let selector = NoteSelector::builder()
            .set_date(t)
            .set_date_relation(relation)
            .build();
        assert_eq!(
            ids(&match_notes(&selector, &notes).unwrap()),
            expected,
            "relation {relation:?}"
        );
    }
}

#[test]
fn notes_without_execution_dates_never_match_date_filters() {
    let t = reference_time();
    let notes = vec![note(1, 0, Vec::new()), note(2, 0, vec![t])];
    for relation in [Relation::Before, Relation::After, Relation::GreaterEquals] {
        let selector = NoteSelector::builder()
            .set_date(t + Duration::days(365))
            .set_date_relation(relation)
            .build();
        assert!(!ids(&match_notes(&selector, &notes).unwrap()).contains(&1));
    }

    let priority_only = NoteSelector::builder()
        .set_priority(0)
        .set_priority_relation(Relation::Equals)
        .build();
    assert_eq!(ids(&match_notes(&priority_only, &notes).unwrap()), vec![1, 2]);
}

#[test]
fn invalid_selector_fails_before_matching() {
    let selector = NoteSelector::builder()
        .set_id_relation(Relation::Equals)
        .build();
    assert!(matches!(
        match_notes(&selector, &sample_notes()),
        Err(SelectorError::InvalidSelector(_))
    ));
}
