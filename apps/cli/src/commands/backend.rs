//! Storage backend report.

use std::io::Write;

use anyhow::Result;
use wordmemo_storage::{StorageConfig, StorageFacade};

pub async fn execute(
    facade: &StorageFacade,
    config: &StorageConfig,
    out: &mut impl Write,
) -> Result<()> {
    let report = facade.init_report().await;

    writeln!(out, "requested: {}", report.requested)?;
    writeln!(out, "active:    {}", report.active)?;
    writeln!(out, "data dir:  {}", config.data_dir.display())?;
    if let Some(endpoint) = &config.remote.endpoint {
        writeln!(out, "endpoint:  {endpoint} (timeout {}ms)", config.remote.timeout_ms)?;
    }
    for warning in &report.warnings {
        writeln!(out, "warning:   {warning}")?;
    }
    Ok(())
}
