//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a progress note on stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a labeled optional field, showing a dash when absent.
pub fn opt_field(label: &str, value: Option<&str>) {
    field(label, value.unwrap_or("-"));
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print JSON, pretty or compact.
pub fn json_as<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    if pretty { json_pretty(value) } else { json(value) }
}
