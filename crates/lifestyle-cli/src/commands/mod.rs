pub mod config;
pub mod dashboard;
pub mod goal;
pub mod import;
pub mod logs;
pub mod review;
pub mod score;
pub mod task;

use chrono::{DateTime, Local, NaiveDate, Utc};
use lifestyle_core::dates::{date_in, parse_date, parse_timestamp};
use lifestyle_core::{Clock, Database, SystemClock};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The instant a command runs at: `--at` when given, otherwise the system clock.
pub fn resolve_now(at: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match at {
        Some(raw) => Ok(parse_timestamp(raw)?),
        None => Ok(SystemClock.now()),
    }
}

/// Calendar date of `instant` on the local wall clock.
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    date_in(instant, &Local)
}

pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(local_date(SystemClock.now())),
    }
}

/// Open the store and run log maintenance for the day being viewed, but
/// never past the real local date: logs due today or later stay pending
/// whatever date a command is asked about.
///
/// Log maintenance failures are reported and otherwise ignored so reads
/// still work against a partially maintained store.
pub fn open_synced(viewed: NaiveDate) -> Result<Database, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let target = viewed.min(local_date(SystemClock.now()));
    match db.ensure_logs_up_to_date(target) {
        Ok(summary) => tracing::debug!(
            %target,
            generated = summary.generated,
            marked_missed = summary.marked_missed,
            "task logs up to date"
        ),
        Err(e) => tracing::warn!(error = %e, "task log maintenance failed"),
    }
    Ok(db)
}
