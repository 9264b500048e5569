use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use donkey_engine::PingStats;

/// One server generation's view of its own start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRecord {
    pub started_at: i64,
    /// Value of the restart counter right after this start.
    pub generation: i32,
}

#[derive(Debug, Default)]
struct Starts {
    first_start_time: Option<i64>,
    last_start_time: i64,
    restart_count: i32,
}

/// Start/restart bookkeeping shared by every server generation of a
/// process.
///
/// The daemon owns one for the whole process; tests build their own.
#[derive(Debug, Default)]
pub struct Lifecycle {
    starts: Mutex<Starts>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Starts> {
        // The critical sections cannot leave the counters half-updated.
        self.starts.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record_start(&self) -> StartRecord {
        self.record_start_at(Utc::now().timestamp())
    }

    pub fn record_start_at(&self, now: i64) -> StartRecord {
        let mut starts = self.lock();
        starts.first_start_time.get_or_insert(now);
        starts.last_start_time = now;
        starts.restart_count = starts.restart_count.saturating_add(1);
        StartRecord {
            started_at: now,
            generation: starts.restart_count,
        }
    }

    /// Process-wide counters as of now.
    pub fn snapshot(&self) -> PingStats {
        let starts = self.lock();
        PingStats {
            first_start_time: starts.first_start_time.unwrap_or_default(),
            last_start_time: starts.last_start_time,
            restart_count: starts.restart_count,
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
