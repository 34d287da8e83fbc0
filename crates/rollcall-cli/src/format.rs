//! Human-readable roster output.

use std::fmt::Write as _;

use time::OffsetDateTime;

use rollcall_types::RosterEntry;

/// Format a timestamp as a wall-clock time (UTC).
pub fn clock_time(timestamp: OffsetDateTime) -> String {
    let t = timestamp.time();
    format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

/// Render the roster as a padded table in insertion order.
pub fn roster_table(entries: &[RosterEntry]) -> String {
    if entries.is_empty() {
        return "No students recorded.\n".to_string();
    }

    let roll_width = column_width("Roll No", entries.iter().map(|e| e.roll_number.as_str()));
    let label_width = column_width("Device", entries.iter().map(|e| e.raw_label.as_str()));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:roll_width$}  {:label_width$}  {:8}  Status",
        "Roll No", "Device", "Time"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:roll_width$}  {:label_width$}  {:8}  {}",
            entry.roll_number.as_str(),
            entry.raw_label,
            clock_time(entry.recorded_at),
            entry.status,
        );
    }
    let _ = writeln!(out, "\n{} student(s) recorded.", entries.len());
    out
}

/// Column width fitting the header and every value.
fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(str::len)
        .chain([header.len()])
        .max()
        .unwrap_or(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_types::RollNumber;

    fn entry(roll: &str, label: &str, seconds: i64) -> RosterEntry {
        RosterEntry::present(
            RollNumber::new(roll),
            label,
            OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(seconds),
        )
    }

    #[test]
    fn clock_time_is_zero_padded() {
        let timestamp = OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(9 * 3600 + 5 * 60 + 3);
        assert_eq!(clock_time(timestamp), "09:05:03");
    }

    #[test]
    fn empty_roster_has_a_friendly_message() {
        assert_eq!(roster_table(&[]), "No students recorded.\n");
    }

    #[test]
    fn table_lists_entries_in_order() {
        let entries = [
            entry("1001", "RollNo_1001", 60),
            entry("EE123456", "EE123456", 120),
        ];

        let table = roster_table(&entries);
        let lines: Vec<_> = table.lines().collect();

        assert!(lines[0].starts_with("Roll No"));
        assert!(lines[1].starts_with("1001"));
        assert!(lines[1].contains("00:01:00"));
        assert!(lines[1].ends_with("Present"));
        assert!(lines[2].starts_with("EE123456"));
        assert!(table.contains("2 student(s) recorded."));
    }

    #[test]
    fn columns_widen_to_fit_long_values() {
        let entries = [entry("1", "A very long device label", 0)];
        let table = roster_table(&entries);

        // Header and row align on the widened label column.
        let header_pos = table.lines().next().unwrap().find("Time").unwrap();
        let row_pos = table.lines().nth(1).unwrap().find("00:00:00").unwrap();
        assert_eq!(header_pos, row_pos);
    }
}
