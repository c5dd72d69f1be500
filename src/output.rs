use std::fs;
use std::path::Path;

use anyhow::Context;
use log::warn;
use vliw_common::bundle::Schedule;

use crate::Schedules;

/// Render a schedule as a JSON array of five-slot bundles.
pub fn render(schedule: &Schedule, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(schedule)
    } else {
        serde_json::to_string(schedule)
    }
}

/// Write both schedules. Both are rendered before anything is written, and
/// the first file is removed again if the second cannot be written.
pub fn write_schedules(
    list_path: &Path,
    pipelined_path: &Path,
    schedules: &Schedules,
    pretty: bool,
) -> anyhow::Result<()> {
    let list = rendered(&schedules.list, pretty)?;
    let pipelined = rendered(&schedules.pipelined, pretty)?;

    write(list_path, list)?;

    if let Err(err) = write(pipelined_path, pipelined) {
        if let Err(removed) = fs::remove_file(list_path) {
            warn!("could not remove '{}': {removed}", list_path.display());
        }

        return Err(err);
    }

    Ok(())
}

fn rendered(schedule: &Schedule, pretty: bool) -> serde_json::Result<String> {
    let mut json = render(schedule, pretty)?;
    json.push('\n');
    Ok(json)
}

fn write(path: &Path, json: String) -> anyhow::Result<()> {
    fs::write(path, json).with_context(|| format!("could not write '{}'", path.display()))
}
