use jourj_core::db::open_db_in_memory;
use jourj_core::{
    ConfirmationStatus, ContractStatus, Document, Event, Person, PersonRepository, RepoError,
    SqliteDocumentRepository, SqliteEventRepository, SqlitePersonRepository, SqliteTaskRepository,
    SqliteVendorRepository, Task, TaskRepository, TaskStatus, Vendor, VendorRepository,
    DEFAULT_EVENT_ID,
};
use jourj_core::{DocumentRepository, EventRepository};

#[test]
fn event_create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();

    let mut event = Event::new("Garden wedding");
    event.event_type = "wedding".to_string();
    event.location = "Lyon".to_string();
    let id = repo.create_event(&event).unwrap();

    let loaded = repo.get_event(&id).unwrap().unwrap();
    assert_eq!(loaded.id, event.id);
    assert_eq!(loaded.name, "Garden wedding");
    assert_eq!(loaded.event_type, "wedding");
    assert_eq!(loaded.magic_word, None);
}

#[test]
fn update_unknown_event_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();

    let event = Event::new("never stored");
    let err = repo.update_event(&event).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == event.id));
}

#[test]
fn delete_unknown_person_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let err = repo.delete_person("missing-id").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "missing-id"));
}

#[test]
fn person_update_replaces_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let mut person = Person::new("evt-1", "Nadia");
    repo.create_person(&person).unwrap();

    person.role = "photographer".to_string();
    person.status = ConfirmationStatus::Confirmed;
    repo.update_person(&person).unwrap();

    let loaded = repo.get_person(&person.id).unwrap().unwrap();
    assert_eq!(loaded.role, "photographer");
    assert_eq!(loaded.status, ConfirmationStatus::Confirmed);
}

#[test]
fn event_scope_filters_by_event_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let ours = Person::new("evt-1", "ours");
    let theirs = Person::new("evt-2", "theirs");
    repo.create_person(&ours).unwrap();
    repo.create_person(&theirs).unwrap();

    let listed = repo.list_for_event("evt-1").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, ours.id);

    let other = repo.list_for_event("evt-2").unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].id, theirs.id);
}

#[test]
fn unassigned_rows_surface_under_default_event_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let mut legacy = Person::new("evt-1", "legacy");
    legacy.event_id = None;
    repo.create_person(&legacy).unwrap();

    let default_view = repo.list_for_event(DEFAULT_EVENT_ID).unwrap();
    assert_eq!(default_view.len(), 1);
    assert_eq!(default_view[0].id, legacy.id);

    assert!(repo.list_for_event("evt-1").unwrap().is_empty());
}

#[test]
fn vendor_contract_status_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVendorRepository::try_new(&conn).unwrap();

    let mut vendor = Vendor::new("evt-1", "Fleurs & Co");
    vendor.contract_status = ContractStatus::Negotiation;
    repo.create_vendor(&vendor).unwrap();

    vendor.contract_status = ContractStatus::Signed;
    repo.update_vendor(&vendor).unwrap();

    let loaded = repo.get_vendor(&vendor.id).unwrap().unwrap();
    assert_eq!(loaded.contract_status, ContractStatus::Signed);
}

#[test]
fn task_completion_stamps_and_clears_completed_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut task = Task::new("evt-1", "book venue");
    repo.create_task(&task).unwrap();
    assert!(repo.get_task(&task.id).unwrap().unwrap().completed_at.is_none());

    task.status = TaskStatus::Completed;
    repo.update_task(&task).unwrap();
    let completed = repo.get_task(&task.id).unwrap().unwrap();
    let stamp = completed.completed_at.expect("completion should be stamped");

    // Staying completed keeps the original stamp.
    repo.update_task(&completed).unwrap();
    let unchanged = repo.get_task(&task.id).unwrap().unwrap();
    assert_eq!(unchanged.completed_at, Some(stamp));

    task.status = TaskStatus::Pending;
    repo.update_task(&task).unwrap();
    let reopened = repo.get_task(&task.id).unwrap().unwrap();
    assert!(reopened.completed_at.is_none());
}

#[test]
fn task_assigned_ids_roundtrip_through_json_columns() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut task = Task::new("evt-1", "seating plan");
    task.assigned_person_ids = vec!["p-1".to_string(), "p-2".to_string()];
    task.assigned_vendor_ids = vec!["v-9".to_string()];
    repo.create_task(&task).unwrap();

    let loaded = repo.get_task(&task.id).unwrap().unwrap();
    assert_eq!(loaded.assigned_person_ids, vec!["p-1", "p-2"]);
    assert_eq!(loaded.assigned_vendor_ids, vec!["v-9"]);
}

#[test]
fn document_delete_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();

    let mut document = Document::new("evt-1", "contract.pdf");
    document.file_size_bytes = 2048;
    repo.create_document(&document).unwrap();

    repo.delete_document(&document.id).unwrap();
    assert!(repo.get_document(&document.id).unwrap().is_none());

    let err = repo.delete_document(&document.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn magic_word_lookup_is_exact() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();

    let mut event = Event::new("secret party");
    event.magic_word = Some("sunflower".to_string());
    repo.create_event(&event).unwrap();

    let hit = repo.find_by_magic_word("sunflower").unwrap().unwrap();
    assert_eq!(hit.id, event.id);
    assert!(repo.find_by_magic_word("Sunflower").unwrap().is_none());
    assert!(repo.find_by_magic_word("").unwrap().is_none());
}
