//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `jourj_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use jourj_core::db::open_db_in_memory;
use jourj_core::{default_log_level, init_logging, CurrentEventService};

fn main() {
    println!("jourj_core version={}", jourj_core::core_version());

    let log_dir = std::env::temp_dir().join("jourj-logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("jourj_core logging init failed: {err}");
    }

    match open_db_in_memory() {
        Ok(conn) => match CurrentEventService::try_new(&conn)
            .and_then(|service| service.current_event_id())
        {
            Ok(event_id) => println!("jourj_core current_event={event_id}"),
            Err(err) => eprintln!("jourj_core bootstrap failed: {err}"),
        },
        Err(err) => eprintln!("jourj_core store open failed: {err}"),
    }
}
