//! Deduplicated attendance roster.

use std::collections::HashSet;

use time::OffsetDateTime;
use tracing::debug;

use rollcall_types::{RollNumber, RosterEntry};

/// Outcome of a roster insert attempt.
///
/// A duplicate is a normal no-op outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First sighting; the entry was appended to the roster.
    Inserted(RosterEntry),
    /// The roll number is already on the roster; nothing changed.
    Duplicate,
}

impl RecordOutcome {
    /// Whether this outcome added a new entry.
    #[must_use]
    pub fn is_inserted(&self) -> bool {
        matches!(self, RecordOutcome::Inserted(_))
    }
}

/// Insertion-ordered set of recorded roll numbers for one scanning session.
///
/// Set semantics are keyed by exact roll-number equality; iteration order is
/// insertion order. The roster lives in memory for the lifetime of a
/// scanning session and is emptied only by [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct AttendanceRoster {
    entries: Vec<RosterEntry>,
    seen: HashSet<RollNumber>,
}

impl AttendanceRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a roll number if it is not already on the roster.
    ///
    /// Idempotent: recording a roll number that is already present returns
    /// [`RecordOutcome::Duplicate`] without touching the existing entry or
    /// its timestamp.
    pub fn record_if_new(
        &mut self,
        roll_number: RollNumber,
        raw_label: impl Into<String>,
        now: OffsetDateTime,
    ) -> RecordOutcome {
        if self.seen.contains(&roll_number) {
            debug!("Roll number {} already recorded", roll_number);
            return RecordOutcome::Duplicate;
        }

        self.seen.insert(roll_number.clone());
        let entry = RosterEntry::present(roll_number, raw_label, now);
        self.entries.push(entry.clone());
        RecordOutcome::Inserted(entry)
    }

    /// Empty the roster unconditionally and reset dedup state.
    ///
    /// A roll number seen before the clear inserts again afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }

    /// Entries in insertion order, as a value copy.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RosterEntry> {
        self.entries.clone()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a roll number has been recorded this session.
    #[must_use]
    pub fn contains(&self, roll_number: &RollNumber) -> bool {
        self.seen.contains(roll_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(seconds)
    }

    #[test]
    fn first_insert_then_duplicate() {
        let mut roster = AttendanceRoster::new();

        let outcome = roster.record_if_new("CS2023001".into(), "CS2023001", at(1));
        assert!(outcome.is_inserted());

        let outcome = roster.record_if_new("CS2023001".into(), "CS2023001", at(2));
        assert_eq!(outcome, RecordOutcome::Duplicate);

        let snapshot = roster.snapshot();
        assert_eq!(snapshot.len(), 1);
        // The original timestamp survives the duplicate attempt.
        assert_eq!(snapshot[0].recorded_at, at(1));
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut roster = AttendanceRoster::new();
        roster.record_if_new("1001".into(), "RollNo_1001", at(1));
        roster.record_if_new("EE123456".into(), "EE123456", at(2));
        roster.record_if_new("42".into(), "42", at(3));

        let rolls: Vec<_> = roster
            .snapshot()
            .into_iter()
            .map(|e| e.roll_number.into_inner())
            .collect();
        assert_eq!(rolls, ["1001", "EE123456", "42"]);
    }

    #[test]
    fn snapshot_is_a_value_copy() {
        let mut roster = AttendanceRoster::new();
        roster.record_if_new("1001".into(), "RollNo_1001", at(1));

        let mut snapshot = roster.snapshot();
        snapshot.clear();

        assert_eq!(roster.len(), 1);
        assert!(roster.contains(&"1001".into()));
    }

    #[test]
    fn clear_resets_dedup_state() {
        let mut roster = AttendanceRoster::new();
        roster.record_if_new("1001".into(), "RollNo_1001", at(1));
        assert!(!roster.is_empty());

        roster.clear();
        assert!(roster.is_empty());
        assert!(roster.snapshot().is_empty());

        // A previously seen roll number inserts again after the clear.
        let outcome = roster.record_if_new("1001".into(), "RollNo_1001", at(9));
        assert!(outcome.is_inserted());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.snapshot()[0].recorded_at, at(9));
    }
}
