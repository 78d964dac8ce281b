//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes with their execution and reminder dates.
//! - Apply compiled selectors to the `notes` / `execution_dates` join.
//! - Reassemble joined rows into complete `Note` values.
//!
//! # Invariants
//! - Writes touching several tables run in one transaction.
//! - Selectors compare against each note's first execution date (lowest
//!   `execution_dates.id`), matching `query::matcher`.
//! - Returned notes carry every date row exactly once, in insertion order.
//! - Results are ordered by note id.

use crate::db::{timestamp_from_db, timestamp_to_db, DbError};
use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::query::compile::{compile_with, BoundValue, IdListBinding};
use crate::query::selector::NoteSelector;
use crate::query::SelectorError;
use crate::repo::ensure_storable_selector;
use chrono::NaiveDateTime;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Distinct ids of notes selected by a compiled predicate.
///
/// `ex` is restricted to each note's first execution date; notes without
/// execution dates keep a NULL `ex` row and fail every date comparison.
const SELECTED_IDS_SQL: &str = "SELECT DISTINCT n.id
FROM notes n
LEFT JOIN execution_dates ex
    ON ex.id = (
        SELECT MIN(first_ex.id)
        FROM execution_dates first_ex
        WHERE first_ex.note_id = n.id
    )";

const NOTE_ROWS_SQL: &str = "SELECT
    n.id AS note_id,
    n.headline AS headline,
    n.note_text AS note_text,
    n.priority AS priority,
    ex.id AS execution_id,
    ex.execution_date AS execution_date,
    re.id AS reminder_id,
    re.reminder_date AS reminder_date
FROM notes n
LEFT JOIN execution_dates ex ON ex.note_id = n.id
LEFT JOIN reminder_dates re ON re.note_id = n.id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Selector(SelectorError),
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selector(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Selector(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SelectorError> for RepoError {
    fn from(value: SelectorError) -> Self {
        Self::Selector(value)
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for notes.
pub trait NoteRepository {
    /// Persists a new note with its dates and returns the assigned id.
    ///
    /// Any id carried by `note` is ignored.
    fn create_note(&mut self, note: &Note) -> RepoResult<NoteId>;
    /// Returns every note selected by `selector`, ordered by id.
    fn get_notes(&self, selector: &NoteSelector) -> RepoResult<Vec<Note>>;
    /// Replaces content and both date lists of the note with `note.id`.
    ///
    /// Returns the number of updated note rows; a missing note is `NotFound`.
    fn update_note(&mut self, note: &Note) -> RepoResult<usize>;
    /// Deletes every note selected by `selector` and returns the count.
    fn delete_notes(&mut self, selector: &NoteSelector) -> RepoResult<usize>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&mut self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (headline, note_text, priority) VALUES (?1, ?2, ?3);",
            params![note.headline.as_str(), note.note_text.as_str(), note.priority],
        )?;
        let note_id = tx.last_insert_rowid();
        insert_dates(&tx, note_id, note)?;
        tx.commit()?;

        Ok(note_id)
    }

    fn get_notes(&self, selector: &NoteSelector) -> RepoResult<Vec<Note>> {
        let (selection_sql, bind_values) = selection_query(selector)?;
        let sql = format!(
            "{NOTE_ROWS_SQL} WHERE n.id IN ({selection_sql}) ORDER BY n.id, ex.id, re.id;"
        );
        debug!(
            "event=notes_query module=repo status=start bind_count={}",
            bind_values.len()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut assembler = NoteAssembler::default();
        while let Some(row) = rows.next()? {
            assembler.push_row(row)?;
        }

        Ok(assembler.finish())
    }

    fn update_note(&mut self, note: &Note) -> RepoResult<usize> {
        note.validate()?;
        let note_id = note.id.ok_or_else(|| {
            RepoError::InvalidData("note id is required for update".to_string())
        })?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                headline = ?1,
                note_text = ?2,
                priority = ?3
             WHERE id = ?4;",
            params![
                note.headline.as_str(),
                note.note_text.as_str(),
                note.priority,
                note_id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note_id));
        }

        tx.execute("DELETE FROM execution_dates WHERE note_id = ?1;", [note_id])?;
        tx.execute("DELETE FROM reminder_dates WHERE note_id = ?1;", [note_id])?;
        insert_dates(&tx, note_id, note)?;
        tx.commit()?;

        Ok(changed)
    }

    fn delete_notes(&mut self, selector: &NoteSelector) -> RepoResult<usize> {
        let (selection_sql, bind_values) = selection_query(selector)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let ids = {
            let mut stmt = tx.prepare(&format!("{selection_sql} ORDER BY n.id;"))?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut ids: Vec<NoteId> = Vec::new();
            while let Some(row) = rows.next()? {
                ids.push(row.get(0)?);
            }
            ids
        };

        let mut deleted = 0;
        for id in &ids {
            deleted += tx.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        }
        tx.commit()?;

        Ok(deleted)
    }
}

/// Compiles `selector` into the id-selection subquery and its bindings.
fn selection_query(selector: &NoteSelector) -> RepoResult<(String, Vec<Value>)> {
    let compiled = compile_with(selector, IdListBinding::Expanded)?;
    ensure_storable_selector(selector)?;
    let sql = format!("{SELECTED_IDS_SQL} {}", compiled.sql);
    let values = compiled
        .params
        .into_iter()
        .map(bound_to_sql)
        .collect::<RepoResult<Vec<_>>>()?;
    Ok((sql, values))
}

fn bound_to_sql(value: BoundValue) -> RepoResult<Value> {
    Ok(match value {
        BoundValue::Integer(value) => Value::Integer(value),
        BoundValue::Text(value) => Value::Text(value),
        BoundValue::Timestamp(value) => Value::Integer(stored_timestamp(value)?),
    })
}

fn stored_timestamp(value: NaiveDateTime) -> RepoResult<i64> {
    timestamp_to_db(value)
        .ok_or_else(|| RepoError::InvalidData(format!("timestamp {value} is out of range")))
}

fn insert_dates(tx: &Transaction<'_>, note_id: NoteId, note: &Note) -> RepoResult<()> {
    for date in &note.execution_dates {
        tx.execute(
            "INSERT INTO execution_dates (note_id, execution_date) VALUES (?1, ?2);",
            params![note_id, stored_timestamp(*date)?],
        )?;
    }
    for date in &note.reminder_dates {
        tx.execute(
            "INSERT INTO reminder_dates (note_id, reminder_date) VALUES (?1, ?2);",
            params![note_id, stored_timestamp(*date)?],
        )?;
    }
    Ok(())
}

/// Folds `note x execution date x reminder date` rows back into notes.
///
/// Rows must arrive ordered by note id, then date row ids.
#[derive(Default)]
struct NoteAssembler {
    notes: Vec<Note>,
    seen_execution_ids: BTreeSet<i64>,
    seen_reminder_ids: BTreeSet<i64>,
}

impl NoteAssembler {
    fn push_row(&mut self, row: &Row<'_>) -> RepoResult<()> {
        let note_id: NoteId = row.get("note_id")?;
        if self.notes.last().and_then(|note| note.id) != Some(note_id) {
            self.seen_execution_ids.clear();
            self.seen_reminder_ids.clear();
            self.notes.push(Note {
                id: Some(note_id),
                headline: row.get("headline")?,
                note_text: row.get("note_text")?,
                priority: row.get("priority")?,
                execution_dates: Vec::new(),
                reminder_dates: Vec::new(),
            });
        }

        let execution = read_date(row, "execution_id", "execution_date")?;
        let reminder = read_date(row, "reminder_id", "reminder_date")?;
        let Some(note) = self.notes.last_mut() else {
            return Ok(());
        };
        if let Some((row_id, date)) = execution {
            if self.seen_execution_ids.insert(row_id) {
                note.execution_dates.push(date);
            }
        }
        if let Some((row_id, date)) = reminder {
            if self.seen_reminder_ids.insert(row_id) {
                note.reminder_dates.push(date);
            }
        }
        Ok(())
    }

    fn finish(self) -> Vec<Note> {
        self.notes
    }
}

fn read_date(
    row: &Row<'_>,
    id_column: &str,
    date_column: &'static str,
) -> RepoResult<Option<(i64, NaiveDateTime)>> {
    let Some(row_id) = row.get::<_, Option<i64>>(id_column)? else {
        return Ok(None);
    };
    let raw: i64 = row.get(date_column)?;
    let date = timestamp_from_db(raw).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{raw}` out of range in {date_column}"))
    })?;
    Ok(Some((row_id, date)))
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("notes", &["id", "headline", "note_text", "priority"]),
        ("execution_dates", &["id", "note_id", "execution_date"]),
        ("reminder_dates", &["id", "note_id", "reminder_date"]),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{selection_query, RepoError, SqliteNoteRepository};
    use crate::db::open_db_in_memory;
    use crate::query::relation::Relation;
    use crate::query::selector::NoteSelector;
    use crate::query::SelectorError;
    use chrono::NaiveDate;
    use rusqlite::types::Value;
    use rusqlite::Connection;

    #[test]
    fn selection_query_expands_id_membership() {
        let selector = NoteSelector::builder()
            .add_ids([1, 2])
            .set_id_relation(Relation::In)
            .build();
        let (sql, values) = selection_query(&selector).unwrap();
        assert!(sql.ends_with("WHERE n.id IN (?, ?)"));
        assert_eq!(values, vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = SqliteNoteRepository::try_new(&mut conn).err().unwrap();
        assert!(err.to_string().contains("notes"));
    }

    #[test]
    fn try_new_accepts_migrated_connection() {
        let mut conn = open_db_in_memory().unwrap();
        assert!(SqliteNoteRepository::try_new(&mut conn).is_ok());
    }

    #[test]
    fn selection_query_binds_dates_at_full_precision() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|date| date.and_hms_nano_opt(0, 0, 1, 500))
            .unwrap();
        let selector = NoteSelector::builder()
            .set_date(date)
            .set_date_relation(Relation::After)
            .build();
        let (_, values) = selection_query(&selector).unwrap();
        assert_eq!(values, vec![Value::Integer(1_000_000_500)]);
    }

    #[test]
    fn selection_query_rejects_unstorable_dates() {
        let far = NaiveDate::from_ymd_opt(2500, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap();
        let selector = NoteSelector::builder()
            .set_date(far)
            .set_date_relation(Relation::Before)
            .build();
        assert!(matches!(
            selection_query(&selector),
            Err(RepoError::Selector(SelectorError::InvalidSelector(_)))
        ));
    }
}
