mod formatter;

pub use formatter::{render_report, render_report_dated};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

/// Write the rendered report atomically so an interrupted run never leaves
/// a half-written file behind.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open report file at {}", path.display()))?;
    file.write_all(content.as_bytes())
        .context("Failed to write report")?;
    file.commit().context("Failed to save report")?;
    Ok(())
}
