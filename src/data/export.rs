use std::path::Path;

use anyhow::{Context, Result};

use super::model::VectorTable;

/// Write the table as CSV with a `time,value,run,module,metric` header.
pub fn write_csv(path: &Path, table: &VectorTable) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for point in &table.points {
        writer.serialize(point).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}
