use clap::Subcommand;
use lifestyle_core::Database;

use super::{print_json, resolve_date, CmdResult};

#[derive(Subcommand)]
pub enum LogsAction {
    /// Generate a day's pending logs and mark older pending logs missed
    Sync {
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: LogsAction, json: bool) -> CmdResult {
    match action {
        LogsAction::Sync { date } => {
            let date = resolve_date(date.as_deref())?;
            let summary = Database::open()?.ensure_logs_up_to_date(date)?;
            if json {
                print_json(&summary)?;
            } else {
                println!(
                    "{date}: {} generated, {} marked missed",
                    summary.generated, summary.marked_missed
                );
            }
        }
    }
    Ok(())
}
