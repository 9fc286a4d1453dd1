use std::path::PathBuf;

use clap::Args;
use lifestyle_core::{histories_from_json, Database};

use super::{print_json, CmdResult};

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file holding an array of goals with nested tasks and task logs
    file: PathBuf,
}

pub fn run(args: ImportArgs, json: bool) -> CmdResult {
    let content = std::fs::read_to_string(&args.file)?;
    let histories = histories_from_json(&content)?;
    let summary = Database::open()?.import_histories(&histories)?;

    if json {
        print_json(&summary)?;
    } else {
        println!(
            "Imported {} goals, {} tasks, {} task logs",
            summary.goals, summary.tasks, summary.logs
        );
    }
    Ok(())
}
