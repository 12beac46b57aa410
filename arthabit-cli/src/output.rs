//! Terminal output helpers shared by the ah commands

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

/// Print a green confirmation line
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print a yellow notice line
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Build the condensed list table the tabular views share, header included
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.to_vec());
    table
}

/// Scale a byte count to the largest unit that keeps it readable
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} bytes", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
