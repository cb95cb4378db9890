use chrono::{Duration, Local};
use jourj_core::db::open_db_in_memory;
use jourj_core::{
    ActivityKind, ConfirmationStatus, ContractStatus, Document, DocumentRepository,
    DocumentSource, Event, EventProjector, EventRepository, ItemStatus, Person, PersonRepository,
    Priority, ProgressStats, SqliteDocumentRepository, SqliteEventRepository,
    SqlitePersonRepository, SqliteTaskRepository, SqliteTimelineRepository,
    SqliteVendorRepository, Task, TaskRepository, TaskStatus, TimelineItem, TimelineRepository,
    Vendor, VendorRepository,
};
use rusqlite::{params, Connection};

fn task(event_id: &str, title: &str, priority: Priority, status: TaskStatus) -> Task {
    let mut task = Task::new(event_id, title);
    task.priority = priority;
    task.status = status;
    task
}

fn pin_task_completion(conn: &Connection, task_id: &str, completed_at: i64) {
    conn.execute(
        "UPDATE tasks SET completed_at = ?1 WHERE id = ?2;",
        params![completed_at, task_id],
    )
    .unwrap();
}

fn pin_item_update(conn: &Connection, item_id: &str, updated_at: i64) {
    conn.execute(
        "UPDATE timeline_items SET updated_at = ?1 WHERE id = ?2;",
        params![updated_at, item_id],
    )
    .unwrap();
}

#[test]
fn progress_stats_on_empty_store_are_all_zero() {
    let conn = open_db_in_memory().unwrap();
    let projector = EventProjector::try_new(&conn).unwrap();

    let stats = projector.progress_stats("evt-1").unwrap();
    assert_eq!(stats, ProgressStats::default());
}

#[test]
fn progress_stats_two_task_scenario() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.create_task(&task("evt-1", "t1", Priority::High, TaskStatus::Pending))
        .unwrap();
    repo.create_task(&task("evt-1", "t2", Priority::Low, TaskStatus::Completed))
        .unwrap();

    let projector = EventProjector::try_new(&conn).unwrap();
    let stats = projector.progress_stats("evt-1").unwrap();
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.progress_percentage, 50);
    assert_eq!(stats.critical_tasks, 1);
}

#[test]
fn progress_stats_ignore_other_events() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.create_task(&task("evt-1", "ours", Priority::Low, TaskStatus::Pending))
        .unwrap();
    repo.create_task(&task("evt-2", "theirs", Priority::Low, TaskStatus::Pending))
        .unwrap();

    let projector = EventProjector::try_new(&conn).unwrap();
    assert_eq!(projector.progress_stats("evt-1").unwrap().total_tasks, 1);
}

#[test]
fn team_and_vendor_summaries_count_confirmations() {
    let conn = open_db_in_memory().unwrap();

    let people = SqlitePersonRepository::try_new(&conn).unwrap();
    let mut confirmed = Person::new("evt-1", "Ana");
    confirmed.status = ConfirmationStatus::Confirmed;
    people.create_person(&confirmed).unwrap();
    people.create_person(&Person::new("evt-1", "Bea")).unwrap();
    let mut declined = Person::new("evt-1", "Cleo");
    declined.status = ConfirmationStatus::Declined;
    people.create_person(&declined).unwrap();

    let vendors = SqliteVendorRepository::try_new(&conn).unwrap();
    let mut signed = Vendor::new("evt-1", "Traiteur");
    signed.contract_status = ContractStatus::Signed;
    vendors.create_vendor(&signed).unwrap();
    vendors.create_vendor(&Vendor::new("evt-1", "DJ")).unwrap();

    let projector = EventProjector::try_new(&conn).unwrap();
    let team = projector.team_summary("evt-1").unwrap();
    assert_eq!((team.total, team.confirmed, team.pending), (3, 1, 2));

    let vendor_summary = projector.vendors_summary("evt-1").unwrap();
    assert_eq!(
        (
            vendor_summary.total,
            vendor_summary.confirmed,
            vendor_summary.pending
        ),
        (2, 1, 1)
    );
}

#[test]
fn critical_tasks_cap_at_five_in_store_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    for index in 0..7 {
        repo.create_task(&task(
            "evt-1",
            &format!("critical-{index}"),
            Priority::High,
            TaskStatus::Pending,
        ))
        .unwrap();
    }
    repo.create_task(&task("evt-1", "done", Priority::High, TaskStatus::Completed))
        .unwrap();

    let projector = EventProjector::try_new(&conn).unwrap();
    let critical = projector.critical_tasks("evt-1").unwrap();
    assert_eq!(critical.len(), 5);
    assert_eq!(critical[0].title, "critical-0");
    assert_eq!(critical[4].title, "critical-4");
}

#[test]
fn upcoming_planning_items_take_first_three_in_display_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTimelineRepository::try_new(&conn).unwrap();

    for (position, title) in ["one", "two", "three", "four"].iter().enumerate() {
        let mut item = TimelineItem::new("evt-1", *title, "09:00", 30);
        // Reversed display order, so insertion order must not win.
        item.order_index = 3 - position as i64;
        repo.create_item(&item).unwrap();
    }

    let projector = EventProjector::try_new(&conn).unwrap();
    let upcoming = projector.upcoming_planning_items("evt-1").unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|it| it.title.as_str()).collect();
    assert_eq!(titles, ["four", "three", "two"]);
}

#[test]
fn timeline_stats_count_states() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTimelineRepository::try_new(&conn).unwrap();

    let mut done = TimelineItem::new("evt-1", "done", "08:00", 30);
    done.status = ItemStatus::Completed;
    repo.create_item(&done).unwrap();

    let mut critical = TimelineItem::new("evt-1", "critical", "09:00", 30);
    critical.priority = Priority::High;
    repo.create_item(&critical).unwrap();

    let mut delayed = TimelineItem::new("evt-1", "late", "10:00", 30);
    delayed.status = ItemStatus::Delayed;
    repo.create_item(&delayed).unwrap();

    let projector = EventProjector::try_new(&conn).unwrap();
    let stats = projector.timeline_stats("evt-1").unwrap();
    assert_eq!(stats.total_steps, 3);
    assert_eq!(stats.completed_steps, 1);
    assert_eq!(stats.critical_steps, 1);
    assert_eq!(stats.delayed_steps, 1);
    assert_eq!(stats.progress_percentage, 33);
}

#[test]
fn recent_activity_merges_tasks_and_items_newest_first() {
    let conn = open_db_in_memory().unwrap();

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    for (title, stamp) in [("t-old", 100i64), ("t-mid", 200), ("t-new", 300)] {
        let record = task("evt-1", title, Priority::Low, TaskStatus::Completed);
        tasks.create_task(&record).unwrap();
        pin_task_completion(&conn, &record.id, stamp);
    }

    let items = SqliteTimelineRepository::try_new(&conn).unwrap();
    for (title, stamp) in [("i-old", 150i64), ("i-new", 250)] {
        let mut record = TimelineItem::new("evt-1", title, "09:00", 30);
        record.status = ItemStatus::Completed;
        items.create_item(&record).unwrap();
        pin_item_update(&conn, &record.id, stamp);
    }

    let projector = EventProjector::try_new(&conn).unwrap();
    let activity = projector.recent_activity("evt-1").unwrap();

    let feed: Vec<(&str, i64)> = activity
        .iter()
        .map(|entry| (entry.title.as_str(), entry.timestamp))
        .collect();
    // 2 newest tasks (300, 200) + 2 newest completed items (250, 150),
    // merged descending.
    assert_eq!(
        feed,
        [("t-new", 300), ("i-new", 250), ("t-mid", 200), ("i-old", 150)]
    );
    assert_eq!(activity[0].kind, ActivityKind::Task);
    assert_eq!(activity[1].kind, ActivityKind::TimelineItem);
}

#[test]
fn days_until_event_is_zero_for_unknown_event_id() {
    let conn = open_db_in_memory().unwrap();
    let projector = EventProjector::try_new(&conn).unwrap();

    // Selection can point at an event that has not loaded yet.
    assert_eq!(projector.days_until_event("evt-42").unwrap(), 0);
}

#[test]
fn days_until_event_counts_forward_and_clamps_past() {
    let conn = open_db_in_memory().unwrap();
    let events = SqliteEventRepository::try_new(&conn).unwrap();

    let mut future = Event::with_id("evt-future", "soon");
    future.event_date = Some(Local::now().date_naive() + Duration::days(10));
    events.create_event(&future).unwrap();

    let mut past = Event::with_id("evt-past", "done");
    past.event_date = Some(Local::now().date_naive() - Duration::days(3));
    events.create_event(&past).unwrap();

    let undated = Event::with_id("evt-undated", "someday");
    events.create_event(&undated).unwrap();

    let projector = EventProjector::try_new(&conn).unwrap();
    assert_eq!(projector.days_until_event("evt-future").unwrap(), 10);
    assert_eq!(projector.days_until_event("evt-past").unwrap(), 0);
    assert_eq!(projector.days_until_event("evt-undated").unwrap(), 0);
}

#[test]
fn document_stats_aggregate_sizes_categories_and_sources() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();

    let mut contract = Document::new("evt-1", "contract.pdf");
    contract.file_size_bytes = 1000;
    contract.category = "contracts".to_string();
    repo.create_document(&contract).unwrap();

    let mut photos = Document::new("evt-1", "photos.zip");
    photos.file_size_bytes = 5000;
    photos.category = "media".to_string();
    photos.source = DocumentSource::GoogleDrive;
    repo.create_document(&photos).unwrap();

    let mut uncategorized = Document::new("evt-1", "misc.txt");
    uncategorized.file_size_bytes = 10;
    repo.create_document(&uncategorized).unwrap();

    let projector = EventProjector::try_new(&conn).unwrap();
    let stats = projector.document_stats("evt-1").unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.total_bytes, 6010);
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.manual, 2);
    assert_eq!(stats.google_drive, 1);
}
