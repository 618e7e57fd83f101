//! JSON-lines event export

use anyhow::{Context, Result};
use crescendo_common::Event;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append events to the export file, one JSON object per line.
/// Returns the number of lines written.
pub fn append_events(path: &str, events: &[Event]) -> Result<usize> {
    if events.is_empty() {
        return Ok(0);
    }

    let expanded = shellexpand::tilde(path);
    let target = Path::new(expanded.as_ref());
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create export directory for {}", path))?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(target)
        .context(format!("Failed to open export file: {}", path))?;

    for event in events {
        let line = serde_json::to_string(event).context("Failed to serialize event")?;
        writeln!(file, "{}", line).context("Failed to write event line")?;
    }

    Ok(events.len())
}
