//! Person repository contract and SQLite implementation.

use crate::id::now_ms;
use crate::model::person::{ConfirmationStatus, Person};
use crate::repo::{ensure_connection_ready, event_scope_sql, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    event_id,
    name,
    role,
    email,
    phone,
    availability,
    status,
    created_at,
    updated_at
FROM people";

/// Repository interface for person CRUD operations.
pub trait PersonRepository {
    fn create_person(&self, person: &Person) -> RepoResult<String>;
    fn update_person(&self, person: &Person) -> RepoResult<()>;
    fn get_person(&self, id: &str) -> RepoResult<Option<Person>>;
    /// Lists people of the active event in insertion order.
    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Person>>;
    /// Lists every person across all events, for snapshot/export paths.
    fn list_all(&self) -> RepoResult<Vec<Person>>;
    fn delete_person(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "people")?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &Person) -> RepoResult<String> {
        self.conn.execute(
            "INSERT INTO people (
                id, event_id, name, role, email, phone, availability, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                person.id,
                person.event_id.as_deref(),
                person.name,
                person.role,
                person.email,
                person.phone,
                person.availability,
                person.status.as_str(),
                person.created_at,
                person.updated_at,
            ],
        )?;

        Ok(person.id.clone())
    }

    fn update_person(&self, person: &Person) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE people
             SET
                event_id = ?1,
                name = ?2,
                role = ?3,
                email = ?4,
                phone = ?5,
                availability = ?6,
                status = ?7,
                updated_at = ?8
             WHERE id = ?9;",
            params![
                person.event_id.as_deref(),
                person.name,
                person.role,
                person.email,
                person.phone,
                person.availability,
                person.status.as_str(),
                now_ms(),
                person.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.id.clone()));
        }

        Ok(())
    }

    fn get_person(&self, id: &str) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL} WHERE {} ORDER BY created_at ASC, id ASC;",
            event_scope_sql()
        ))?;
        let mut rows = stmt.query([event_id])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn list_all(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn delete_person(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM people WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let status_text: String = row.get("status")?;
    let status = ConfirmationStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in people.status"))
    })?;

    Ok(Person {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        name: row.get("name")?,
        role: row.get("role")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        availability: row.get("availability")?,
        status,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
