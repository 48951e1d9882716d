use colored::Colorize;
use reconcile::{Changeset, Record, RecordKey};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Record Rendering
// ============================================================================

fn record_line(record: &Record) -> String {
    format!(
        "{} {} {}  {}",
        record.name,
        record.rtype.as_str().bold(),
        record.value,
        format!("({})", record.zone).dimmed()
    )
}

/// Print a changeset, deletes first as they will be applied
pub fn changeset(changeset: &Changeset) {
    if changeset.is_empty() {
        success("No changes - PowerDNS matches NetBox");
        return;
    }

    if !changeset.to_delete.is_empty() {
        section(&format!("Delete ({})", changeset.to_delete.len()));
        for record in &changeset.to_delete {
            println!("  {} {}", "-".red(), record_line(record));
        }
    }

    if !changeset.to_create.is_empty() {
        section(&format!("Create ({})", changeset.to_create.len()));
        for record in &changeset.to_create {
            println!("  {} {}", "+".green(), record_line(record));
        }
    }

    let summary = changeset.summary();
    println!();
    println!(
        "{} to create, {} to delete",
        summary.creates.to_string().green(),
        summary.deletes.to_string().red()
    );
}

/// Report the duplicate keys that stopped a run
pub fn duplicates(keys: &[RecordKey]) {
    warn(&format!(
        "{} duplicate record(s) in NetBox, nothing was changed",
        keys.len()
    ));
    for key in keys {
        dim(&key.to_string());
    }
}
