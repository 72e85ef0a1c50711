//! Handler for the `list` command.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::error::Result;
use crate::port::SchedulerClient;
use crate::runner::{AppRunner, AppSummary};

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "App Name")]
    name: String,
    #[tabled(rename = "Instances")]
    instances: u32,
    #[tabled(rename = "DiskMB")]
    disk_mb: u32,
    #[tabled(rename = "MemoryMB")]
    memory_mb: u32,
    #[tabled(rename = "Route")]
    routes: String,
}

fn hostnames(app: &AppSummary) -> Vec<String> {
    app.routes
        .iter()
        .flat_map(|route| route.hostnames.iter().cloned())
        .collect()
}

impl From<&AppSummary> for AppRow {
    fn from(app: &AppSummary) -> Self {
        Self {
            name: app.name.clone(),
            instances: app.instances,
            disk_mb: app.disk_mb,
            memory_mb: app.memory_mb,
            routes: hostnames(app).join(", "),
        }
    }
}

/// Execute the list command.
pub async fn execute<C: SchedulerClient>(runner: &AppRunner<C>) -> Result<()> {
    let apps = runner.list_apps().await?;

    if output::is_json() {
        for app in &apps {
            output::record(
                "app",
                json!({
                    "name": app.name,
                    "instances": app.instances,
                    "cpu_weight": app.cpu_weight,
                    "disk_mb": app.disk_mb,
                    "memory_mb": app.memory_mb,
                    "routes": hostnames(app),
                }),
            );
        }
        return Ok(());
    }

    if apps.is_empty() {
        output::warning("No apps to display.");
        return Ok(());
    }

    let rows: Vec<AppRow> = apps.iter().map(AppRow::from).collect();
    output::block(&Table::new(rows).with(Style::blank()).to_string());
    Ok(())
}
