//! Handler for the `submit` command.

use std::io::Read;
use std::path::Path;

use crate::cli::{output, SubmitArgs};
use crate::error::Result;
use crate::port::SchedulerClient;
use crate::runner::AppRunner;

/// Execute the submit command.
pub async fn execute<C: SchedulerClient>(runner: &AppRunner<C>, args: &SubmitArgs) -> Result<()> {
    let json = read_input(&args.file)?;

    match runner.submit_lrp(&json).await {
        Ok(process_guid) => {
            output::success(&format!("Successfully submitted {process_guid}."));
            Ok(())
        }
        Err(err) => {
            if let Some(process_guid) = &err.process_guid {
                output::field("app", process_guid);
            }
            Err(err.source)
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(path)?)
    }
}
