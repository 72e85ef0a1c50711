//! Handler for the `remove` command.

use crate::cli::{output, RemoveArgs};
use crate::error::Result;
use crate::port::SchedulerClient;
use crate::runner::AppRunner;

/// Execute the remove command.
///
/// Every name is attempted; the first failure is returned after the rest
/// have been tried.
pub async fn execute<C: SchedulerClient>(runner: &AppRunner<C>, args: &RemoveArgs) -> Result<()> {
    let mut first_error = None;

    for name in &args.names {
        match runner.remove_app(name).await {
            Ok(()) => output::success(&format!("Removed {name}.")),
            Err(err) if first_error.is_none() => first_error = Some(err),
            Err(err) => output::error(&format!("Error removing {name}: {err}")),
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
