//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::CommitRecord;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// One summary line for a commit: short hash and message, cut to 60 characters.
pub fn commit_line(record: &CommitRecord) -> String {
    let message = if record.message.chars().count() > 60 {
        let cut: String = record.message.chars().take(60).collect();
        format!("{}...", cut)
    } else {
        record.message.clone()
    };
    format!("{} {}", record.short_hash(), message)
}

/// Display the commits found since the packaged one.
///
/// Shows up to 10 commits, newest first, then a count of the rest.
///
/// # Arguments
/// * `records` - New commits, newest first
/// * `package` - The package being refreshed
pub fn display_new_commits(records: &[CommitRecord], package: &str) {
    println!(
        "\n{}",
        style(format!("New upstream commits for '{}'", package)).bold()
    );
    println!("{}", style(format!("{} commits:", records.len())).underlined());

    for (i, record) in records.iter().take(10).enumerate() {
        println!("  {}. {}", i + 1, commit_line(record));
    }

    if records.len() > 10 {
        println!("  ... and {} more commits", records.len() - 10);
    }
}

/// Display the old and new `Version:` values.
pub fn display_version_change(old_version: &str, new_version: &str) {
    println!("\n{}", style("Version Change:").bold());
    println!("  From: {}", style(old_version).red());
    println!("  To:   {}", style(new_version).green());
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the changes entry that would be prepended.
pub fn display_entry_preview(entry: &str) {
    println!("\n{}", style("Changes entry:").bold());
    print!("{}", entry);
}
