//! Handler for the `update-routes` command.

use crate::cli::{output, UpdateRoutesArgs};
use crate::error::Result;
use crate::port::SchedulerClient;
use crate::runner::AppRunner;

/// Execute the update-routes command.
pub async fn execute<C: SchedulerClient>(
    runner: &AppRunner<C>,
    args: &UpdateRoutesArgs,
) -> Result<()> {
    if args.routes.is_empty() {
        output::warning(&format!("No routes given; removing all routes from {}.", args.name));
    }

    runner.update_app_routes(&args.name, &args.routes).await?;

    output::success(&format!("Updated routes for {}.", args.name));
    for route in &args.routes {
        output::field(
            "url",
            format!(
                "http://{}.{} -> {}",
                route.hostname_prefix,
                runner.system_domain(),
                route.port
            ),
        );
    }
    Ok(())
}
