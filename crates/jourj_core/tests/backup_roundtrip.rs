use jourj_core::backup::{
    capture_snapshot, create_backup, estimate_usage_bytes, optimize_storage, restore_from_backup,
    write_backup_file, write_export_file, BackupError, SNAPSHOT_VERSION, STORAGE_QUOTA_BYTES,
};
use jourj_core::db::open_db_in_memory;
use jourj_core::{
    CurrentEventService, Document, DocumentRepository, Event, EventRepository, Person,
    PersonRepository, SqliteDocumentRepository, SqliteEventRepository, SqlitePersonRepository,
    SqliteTaskRepository, SqliteTimelineRepository, Task, TaskRepository, TimelineItem,
    TimelineRepository,
};
use std::fs;

fn seeded_connection() -> rusqlite::Connection {
    let conn = open_db_in_memory().unwrap();

    let events = SqliteEventRepository::try_new(&conn).unwrap();
    let mut event = Event::with_id("evt-1", "Launch party");
    event.magic_word = Some("confetti".to_string());
    events.create_event(&event).unwrap();

    let people = SqlitePersonRepository::try_new(&conn).unwrap();
    people.create_person(&Person::new("evt-1", "Maya")).unwrap();

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut task = Task::new("evt-1", "order cake");
    task.assigned_person_ids = vec!["p-1".to_string()];
    tasks.create_task(&task).unwrap();

    let items = SqliteTimelineRepository::try_new(&conn).unwrap();
    items
        .create_item(&TimelineItem::new("evt-1", "doors open", "18:00", 30))
        .unwrap();

    let documents = SqliteDocumentRepository::try_new(&conn).unwrap();
    documents
        .create_document(&Document::new("evt-1", "invite.pdf"))
        .unwrap();

    let selector = CurrentEventService::try_new(&conn).unwrap();
    selector.set_current_event_id("evt-1").unwrap();

    conn
}

#[test]
fn backup_restore_roundtrip_is_elementwise_equal() {
    let source = seeded_connection();
    let blob = create_backup(&source).unwrap();

    let mut target = open_db_in_memory().unwrap();
    restore_from_backup(&mut target, &blob).unwrap();

    let original = capture_snapshot(&source).unwrap();
    let restored = capture_snapshot(&target).unwrap();
    assert_eq!(original, restored);
    assert_eq!(restored.current_event_id.as_deref(), Some("evt-1"));
    assert_eq!(restored.events.len(), 1);
    assert_eq!(restored.tasks[0].assigned_person_ids, vec!["p-1"]);
}

#[test]
fn restore_rejects_garbage_and_keeps_state() {
    let mut conn = seeded_connection();
    let before = capture_snapshot(&conn).unwrap();

    let err = restore_from_backup(&mut conn, "{not json").unwrap_err();
    assert!(matches!(err, BackupError::InvalidPayload(_)));

    let after = capture_snapshot(&conn).unwrap();
    assert_eq!(before, after);
}

#[test]
fn restore_rejects_newer_snapshot_versions() {
    let source = seeded_connection();
    let mut snapshot = capture_snapshot(&source).unwrap();
    snapshot.schema_version = 99;
    let blob = serde_json::to_string(&snapshot).unwrap();

    let mut target = seeded_connection();
    let before = capture_snapshot(&target).unwrap();

    let err = restore_from_backup(&mut target, &blob).unwrap_err();
    assert!(matches!(
        err,
        BackupError::UnsupportedVersion {
            found: 99,
            supported: SNAPSHOT_VERSION,
        }
    ));
    assert_eq!(capture_snapshot(&target).unwrap(), before);
}

#[test]
fn backup_file_is_named_by_date_and_replaced_same_day() {
    let conn = seeded_connection();
    let dir = tempfile::tempdir().unwrap();

    let first = write_backup_file(&conn, dir.path()).unwrap();
    let second = write_backup_file(&conn, dir.path()).unwrap();
    assert_eq!(first, second);

    let name = first.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("jourj-backup-"));
    assert!(name.ends_with(".json"));

    let count = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(count, 1);
}

#[test]
fn usage_estimate_counts_backups_but_not_exports() {
    let conn = seeded_connection();
    let dir = tempfile::tempdir().unwrap();

    let backup = write_backup_file(&conn, dir.path()).unwrap();
    write_export_file(&conn, dir.path()).unwrap();

    let usage = estimate_usage_bytes(dir.path()).unwrap();
    assert_eq!(usage, fs::metadata(&backup).unwrap().len());
}

#[test]
fn optimize_storage_prunes_oldest_backups_over_threshold() {
    let dir = tempfile::tempdir().unwrap();

    // Three fake backups fill the quota; the two oldest must go.
    let chunk = vec![b'x'; (STORAGE_QUOTA_BYTES / 2) as usize];
    for (name, age) in [
        ("jourj-backup-2026-08-01.json", 3u64),
        ("jourj-backup-2026-08-02.json", 2),
        ("jourj-backup-2026-08-03.json", 1),
    ] {
        let path = dir.path().join(name);
        fs::write(&path, &chunk).unwrap();
        let modified = std::time::SystemTime::now() - std::time::Duration::from_secs(age * 60);
        let file = fs::File::options().append(true).open(&path).unwrap();
        file.set_modified(modified).unwrap();
    }

    let removed = optimize_storage(dir.path()).unwrap();
    let removed_names: Vec<&str> = removed
        .iter()
        .map(|path| path.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(
        removed_names,
        ["jourj-backup-2026-08-01.json", "jourj-backup-2026-08-02.json"]
    );
    assert!(dir.path().join("jourj-backup-2026-08-03.json").exists());

    // Under threshold now, a second pass removes nothing.
    assert!(optimize_storage(dir.path()).unwrap().is_empty());
}

#[test]
fn optimize_storage_never_prunes_the_newest_backup() {
    let dir = tempfile::tempdir().unwrap();

    // A single file over the threshold must survive as the last restore point.
    let oversized = vec![b'x'; (STORAGE_QUOTA_BYTES - 1) as usize];
    let only = dir.path().join("jourj-backup-2026-08-10.json");
    fs::write(&only, &oversized).unwrap();

    assert!(optimize_storage(dir.path()).unwrap().is_empty());
    assert!(only.exists());

    // With two oversized files, only the older one goes even though usage
    // still exceeds the threshold afterwards.
    let older = dir.path().join("jourj-backup-2026-08-09.json");
    fs::write(&older, &oversized).unwrap();
    let past = std::time::SystemTime::now() - std::time::Duration::from_secs(120);
    let file = fs::File::options().append(true).open(&older).unwrap();
    file.set_modified(past).unwrap();

    let removed = optimize_storage(dir.path()).unwrap();
    assert_eq!(removed, vec![older]);
    assert!(only.exists());
}

#[test]
fn optimize_storage_on_missing_dir_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("never-created");

    assert_eq!(estimate_usage_bytes(&missing).unwrap(), 0);
    assert!(optimize_storage(&missing).unwrap().is_empty());
}
