//! Handler for the `scale` command.

use crate::cli::{output, ScaleArgs};
use crate::error::Result;
use crate::port::SchedulerClient;
use crate::runner::AppRunner;

/// Execute the scale command.
pub async fn execute<C: SchedulerClient>(runner: &AppRunner<C>, args: &ScaleArgs) -> Result<()> {
    runner.scale_app(&args.name, args.instances).await?;

    output::success(&format!(
        "Scaled {} to {} instance{}.",
        args.name,
        args.instances,
        if args.instances == 1 { "" } else { "s" }
    ));
    Ok(())
}
