use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;

pub fn read_file(path: &Path) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    File::open(path)
        .with_context(|| format!("could not open '{}'", path.display()))?
        .read_to_end(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Read a program stored as a JSON array with one instruction per string.
pub fn read_program(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = read_file(path)?;
    parse_program(&text).with_context(|| format!("in '{}'", path.display()))
}

pub fn parse_program(text: &str) -> anyhow::Result<Vec<String>> {
    serde_json::from_str(text).context("expected a JSON array of instruction strings")
}
