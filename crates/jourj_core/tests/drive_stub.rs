use jourj_core::db::open_db_in_memory;
use jourj_core::{
    DocumentRepository, DocumentSource, DriveError, DriveService, SqliteDocumentRepository,
};

const FOLDER_URL: &str = "https://drive.google.com/drive/folders/1AbC_d-23?usp=sharing";

#[test]
fn connect_stores_the_extracted_folder_id() {
    let conn = open_db_in_memory().unwrap();
    let drive = DriveService::try_new(&conn).unwrap();

    let config = drive.connect("evt-1", FOLDER_URL).unwrap();
    assert_eq!(config.folder_id, "1AbC_d-23");
    assert!(config.connected);
    assert!(config.last_sync_at.is_none());

    let stored = drive.config("evt-1").unwrap().unwrap();
    assert_eq!(stored.folder_url, FOLDER_URL);
}

#[test]
fn connect_rejects_urls_without_folder_id() {
    let conn = open_db_in_memory().unwrap();
    let drive = DriveService::try_new(&conn).unwrap();

    let err = drive
        .connect("evt-1", "https://drive.google.com/file/d/xyz")
        .unwrap_err();
    assert!(matches!(err, DriveError::InvalidFolderUrl(_)));
    assert!(drive.config("evt-1").unwrap().is_none());
}

#[test]
fn sync_materializes_mock_documents_and_stamps_last_sync() {
    let conn = open_db_in_memory().unwrap();
    let drive = DriveService::try_new(&conn).unwrap();
    drive.connect("evt-1", FOLDER_URL).unwrap();

    let synced = drive.sync("evt-1").unwrap();
    assert_eq!(synced.len(), 2);

    let documents = SqliteDocumentRepository::try_new(&conn).unwrap();
    let stored = documents.list_for_event("evt-1").unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored
        .iter()
        .all(|doc| doc.source == DocumentSource::GoogleDrive));
    let names: Vec<&str> = stored.iter().map(|doc| doc.name.as_str()).collect();
    assert!(names.contains(&"Planning checklist.pdf"));
    assert!(names.contains(&"Venue floor plan.png"));

    let config = drive.config("evt-1").unwrap().unwrap();
    assert!(config.last_sync_at.is_some());
}

#[test]
fn sync_without_config_reports_not_connected() {
    let conn = open_db_in_memory().unwrap();
    let drive = DriveService::try_new(&conn).unwrap();

    let err = drive.sync("evt-1").unwrap_err();
    assert!(matches!(err, DriveError::NotConnected(id) if id == "evt-1"));
}

#[test]
fn sync_after_disconnect_reports_not_connected() {
    let conn = open_db_in_memory().unwrap();
    let drive = DriveService::try_new(&conn).unwrap();
    drive.connect("evt-1", FOLDER_URL).unwrap();
    drive.disconnect("evt-1").unwrap();

    let err = drive.sync("evt-1").unwrap_err();
    assert!(matches!(err, DriveError::NotConnected(_)));

    // The folder reference survives for a later reconnect.
    let config = drive.config("evt-1").unwrap().unwrap();
    assert_eq!(config.folder_id, "1AbC_d-23");
    assert!(!config.connected);
}
