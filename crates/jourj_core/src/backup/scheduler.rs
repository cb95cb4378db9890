//! Cancellable auto-backup scheduler.
//!
//! # Responsibility
//! - Write an auto-backup on a fixed interval and run storage optimization on
//!   a longer one, from a background worker with explicit start/stop.
//!
//! # Invariants
//! - The worker serializes under the store lock, so a backup never observes a
//!   half-applied mutation.
//! - `stop()` (and `Drop`) joins the worker; no tick fires afterwards.
//! - Failures are logged and the worker keeps ticking; there is no retry.

use crate::backup::{optimize_storage, write_backup_file};
use log::{error, info};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Default auto-backup cadence.
pub const DEFAULT_BACKUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default storage-optimization cadence.
pub const DEFAULT_OPTIMIZE_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Background worker writing periodic backups of a shared store connection.
pub struct BackupScheduler {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl BackupScheduler {
    /// Starts the worker.
    ///
    /// `backup_interval` controls auto-backup writes into `backup_dir`,
    /// `optimize_interval` the storage-usage check.
    pub fn start(
        store: Arc<Mutex<Connection>>,
        backup_dir: PathBuf,
        backup_interval: Duration,
        optimize_interval: Duration,
    ) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();
        let tick = backup_interval.min(Duration::from_millis(250));

        let handle = std::thread::spawn(move || {
            let mut last_backup = Instant::now();
            let mut last_optimize = Instant::now();

            loop {
                match stop_rx.recv_timeout(tick) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }

                if last_backup.elapsed() >= backup_interval {
                    last_backup = Instant::now();
                    run_backup(&store, &backup_dir);
                }

                if last_optimize.elapsed() >= optimize_interval {
                    last_optimize = Instant::now();
                    run_optimize(&backup_dir);
                }
            }
        });

        info!("event=backup_scheduler module=backup status=started");
        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Stops the worker and waits for it to finish. Idempotent.
    pub fn stop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            info!("event=backup_scheduler module=backup status=stopped");
        }
    }
}

impl Drop for BackupScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_backup(store: &Arc<Mutex<Connection>>, backup_dir: &std::path::Path) {
    let Ok(conn) = store.lock() else {
        error!("event=auto_backup module=backup status=error error=store_lock_poisoned");
        return;
    };

    match write_backup_file(&conn, backup_dir) {
        Ok(path) => {
            info!(
                "event=auto_backup module=backup status=ok file={}",
                path.display()
            );
        }
        Err(err) => {
            error!("event=auto_backup module=backup status=error error={err}");
        }
    }
}

fn run_optimize(backup_dir: &std::path::Path) {
    match optimize_storage(backup_dir) {
        Ok(removed) if removed.is_empty() => {}
        Ok(removed) => {
            info!(
                "event=storage_optimize module=backup status=ok removed={}",
                removed.len()
            );
        }
        Err(err) => {
            error!("event=storage_optimize module=backup status=error error={err}");
        }
    }
}
