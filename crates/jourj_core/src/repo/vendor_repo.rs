//! Vendor repository contract and SQLite implementation.

use crate::id::now_ms;
use crate::model::vendor::{ContractStatus, Vendor};
use crate::repo::{ensure_connection_ready, event_scope_sql, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const VENDOR_SELECT_SQL: &str = "SELECT
    id,
    event_id,
    name,
    service_type,
    contact_person,
    email,
    phone,
    address,
    website,
    notes,
    contract_status,
    created_at,
    updated_at
FROM vendors";

/// Repository interface for vendor CRUD operations.
pub trait VendorRepository {
    fn create_vendor(&self, vendor: &Vendor) -> RepoResult<String>;
    fn update_vendor(&self, vendor: &Vendor) -> RepoResult<()>;
    fn get_vendor(&self, id: &str) -> RepoResult<Option<Vendor>>;
    /// Lists vendors of the active event in insertion order.
    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Vendor>>;
    /// Lists every vendor across all events, for snapshot/export paths.
    fn list_all(&self) -> RepoResult<Vec<Vendor>>;
    fn delete_vendor(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed vendor repository.
pub struct SqliteVendorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVendorRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "vendors")?;
        Ok(Self { conn })
    }
}

impl VendorRepository for SqliteVendorRepository<'_> {
    fn create_vendor(&self, vendor: &Vendor) -> RepoResult<String> {
        self.conn.execute(
            "INSERT INTO vendors (
                id, event_id, name, service_type, contact_person, email, phone,
                address, website, notes, contract_status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                vendor.id,
                vendor.event_id.as_deref(),
                vendor.name,
                vendor.service_type,
                vendor.contact_person,
                vendor.email,
                vendor.phone,
                vendor.address,
                vendor.website,
                vendor.notes,
                vendor.contract_status.as_str(),
                vendor.created_at,
                vendor.updated_at,
            ],
        )?;

        Ok(vendor.id.clone())
    }

    fn update_vendor(&self, vendor: &Vendor) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE vendors
             SET
                event_id = ?1,
                name = ?2,
                service_type = ?3,
                contact_person = ?4,
                email = ?5,
                phone = ?6,
                address = ?7,
                website = ?8,
                notes = ?9,
                contract_status = ?10,
                updated_at = ?11
             WHERE id = ?12;",
            params![
                vendor.event_id.as_deref(),
                vendor.name,
                vendor.service_type,
                vendor.contact_person,
                vendor.email,
                vendor.phone,
                vendor.address,
                vendor.website,
                vendor.notes,
                vendor.contract_status.as_str(),
                now_ms(),
                vendor.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(vendor.id.clone()));
        }

        Ok(())
    }

    fn get_vendor(&self, id: &str) -> RepoResult<Option<Vendor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VENDOR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_vendor_row(row)?));
        }

        Ok(None)
    }

    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Vendor>> {
        let mut stmt = self.conn.prepare(&format!(
            "{VENDOR_SELECT_SQL} WHERE {} ORDER BY created_at ASC, id ASC;",
            event_scope_sql()
        ))?;
        let mut rows = stmt.query([event_id])?;
        let mut vendors = Vec::new();
        while let Some(row) = rows.next()? {
            vendors.push(parse_vendor_row(row)?);
        }

        Ok(vendors)
    }

    fn list_all(&self) -> RepoResult<Vec<Vendor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VENDOR_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut vendors = Vec::new();
        while let Some(row) = rows.next()? {
            vendors.push(parse_vendor_row(row)?);
        }

        Ok(vendors)
    }

    fn delete_vendor(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM vendors WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

fn parse_vendor_row(row: &Row<'_>) -> RepoResult<Vendor> {
    let status_text: String = row.get("contract_status")?;
    let contract_status = ContractStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid contract status `{status_text}` in vendors.contract_status"
        ))
    })?;

    Ok(Vendor {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        name: row.get("name")?,
        service_type: row.get("service_type")?,
        contact_person: row.get("contact_person")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        address: row.get("address")?,
        website: row.get("website")?,
        notes: row.get("notes")?,
        contract_status,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
