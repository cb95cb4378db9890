//! Document repository contract and SQLite implementation.

use crate::id::now_ms;
use crate::model::document::{Document, DocumentSource};
use crate::repo::{
    encode_id_array, ensure_connection_ready, event_scope_sql, parse_id_array, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    event_id,
    vendor_id,
    name,
    file_ref,
    file_type,
    file_size_bytes,
    category,
    source,
    assigned_to,
    created_at,
    updated_at
FROM documents";

/// Repository interface for document CRUD operations.
pub trait DocumentRepository {
    fn create_document(&self, document: &Document) -> RepoResult<String>;
    fn update_document(&self, document: &Document) -> RepoResult<()>;
    fn get_document(&self, id: &str) -> RepoResult<Option<Document>>;
    /// Lists documents of the active event in insertion order.
    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Document>>;
    /// Lists every document across all events, for snapshot/export paths.
    fn list_all(&self) -> RepoResult<Vec<Document>>;
    fn delete_document(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "documents")?;
        Ok(Self { conn })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn create_document(&self, document: &Document) -> RepoResult<String> {
        self.conn.execute(
            "INSERT INTO documents (
                id, event_id, vendor_id, name, file_ref, file_type,
                file_size_bytes, category, source, assigned_to,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                document.id,
                document.event_id.as_deref(),
                document.vendor_id.as_deref(),
                document.name,
                document.file_ref,
                document.file_type,
                document.file_size_bytes,
                document.category,
                document.source.as_str(),
                encode_id_array(&document.assigned_to)?,
                document.created_at,
                document.updated_at,
            ],
        )?;

        Ok(document.id.clone())
    }

    fn update_document(&self, document: &Document) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                event_id = ?1,
                vendor_id = ?2,
                name = ?3,
                file_ref = ?4,
                file_type = ?5,
                file_size_bytes = ?6,
                category = ?7,
                source = ?8,
                assigned_to = ?9,
                updated_at = ?10
             WHERE id = ?11;",
            params![
                document.event_id.as_deref(),
                document.vendor_id.as_deref(),
                document.name,
                document.file_ref,
                document.file_type,
                document.file_size_bytes,
                document.category,
                document.source.as_str(),
                encode_id_array(&document.assigned_to)?,
                now_ms(),
                document.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(document.id.clone()));
        }

        Ok(())
    }

    fn get_document(&self, id: &str) -> RepoResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }

        Ok(None)
    }

    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} WHERE {} ORDER BY created_at ASC, id ASC;",
            event_scope_sql()
        ))?;
        let mut rows = stmt.query([event_id])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }

        Ok(documents)
    }

    fn list_all(&self) -> RepoResult<Vec<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }

        Ok(documents)
    }

    fn delete_document(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let source_text: String = row.get("source")?;
    let source = DocumentSource::parse(&source_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid source `{source_text}` in documents.source"
        ))
    })?;

    let assigned_to_text: String = row.get("assigned_to")?;

    Ok(Document {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        vendor_id: row.get("vendor_id")?,
        name: row.get("name")?,
        file_ref: row.get("file_ref")?,
        file_type: row.get("file_type")?,
        file_size_bytes: row.get("file_size_bytes")?,
        category: row.get("category")?,
        source,
        assigned_to: parse_id_array("documents.assigned_to", &assigned_to_text)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
