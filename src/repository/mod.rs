//! Entry Repository
//!
//! The in-memory measurement collection and the only way to change it.
//!
//! - Entries are always held newest first
//! - Every successful mutation is persisted before the call returns
//! - A failed mutation (validation, empty import, storage) changes nothing
//!
//! Mutations are staged on a copy of the collection; the copy replaces the
//! live collection only after the store accepted it.

pub mod error;
pub mod forms;

pub use error::{RepositoryError, RepositoryResult, ValidationError};
pub use forms::{
    check_ranges, parse_timestamp_in, parse_vital, AddForm, EditForm, EditRequest, NewEntry,
    DATETIME_INPUT_FORMAT,
};

use crate::storage::{sort_descending, Entry, Persistence, Vitals};
use crate::transfer::{self, CsvExport};
use std::collections::HashMap;

/// Prompt shown before an entry is deleted
pub const DELETE_PROMPT: &str = "Delete this entry?";

/// Interactive yes/no confirmation
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Outcome of a CSV import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows that parsed
    pub parsed: usize,
    /// Rows added as new entries
    pub appended: usize,
    /// Rows that overwrote an entry with the same timestamp
    pub replaced: usize,
    /// Non-blank rows that were dropped
    pub skipped: usize,
}

/// Ordered, persisted collection of entries
pub struct EntryRepository {
    entries: Vec<Entry>,
    persistence: Persistence,
}

impl EntryRepository {
    /// Load the stored collection
    pub fn open(persistence: Persistence) -> Self {
        let mut entries = persistence.load();
        sort_descending(&mut entries);

        tracing::info!(count = entries.len(), "Entry repository opened");
        Self {
            entries,
            persistence,
        }
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by id
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Add a manually entered measurement
    pub fn add(&mut self, ts: i64, vitals: Vitals) -> RepositoryResult<Entry> {
        check_ranges(vitals)?;

        let entry = Entry::new(ts, vitals);
        let mut staged = self.entries.clone();
        staged.push(entry.clone());
        self.commit(staged)?;

        tracing::info!(id = %entry.id, ts = entry.ts, "Entry added");
        Ok(entry)
    }

    /// Add an entry from a validated form
    pub fn add_new(&mut self, new_entry: NewEntry) -> RepositoryResult<Entry> {
        self.add(new_entry.ts, new_entry.vitals)
    }

    /// Replace the values of an existing entry
    ///
    /// Returns `Ok(None)` when no entry has this id.
    pub fn edit(&mut self, id: &str, request: &EditRequest) -> RepositoryResult<Option<Entry>> {
        let Some(idx) = self.position(id) else {
            tracing::debug!(id = %id, "Edit ignored, no such entry");
            return Ok(None);
        };

        let vitals = request.validate()?;

        let mut staged = self.entries.clone();
        staged[idx].set_vitals(vitals);
        let updated = staged[idx].clone();
        self.commit(staged)?;

        tracing::info!(id = %id, "Entry edited");
        Ok(Some(updated))
    }

    /// Remove an entry after the user confirmed
    ///
    /// Returns `Ok(None)` when no entry has this id or the user declined.
    pub fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> RepositoryResult<Option<Entry>> {
        let Some(idx) = self.position(id) else {
            tracing::debug!(id = %id, "Delete ignored, no such entry");
            return Ok(None);
        };

        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(id = %id, "Delete declined");
            return Ok(None);
        }

        let mut staged = self.entries.clone();
        let removed = staged.remove(idx);
        self.commit(staged)?;

        tracing::info!(id = %id, "Entry deleted");
        Ok(Some(removed))
    }

    /// Merge CSV rows into the collection, keyed by timestamp
    ///
    /// A row whose timestamp matches an existing entry overwrites that entry's
    /// values (its id is kept); any other row is appended. Imported values are
    /// not range-checked.
    pub fn import_csv(&mut self, text: &str) -> RepositoryResult<ImportSummary> {
        let parsed = transfer::parse_csv(text);
        if parsed.rows.is_empty() {
            tracing::info!(skipped = parsed.rows_skipped, "CSV import found no valid rows");
            return Err(RepositoryError::NoValidRows);
        }

        let mut staged = self.entries.clone();
        let mut by_ts: HashMap<i64, Vec<usize>> = HashMap::new();
        for (idx, entry) in staged.iter().enumerate() {
            by_ts.entry(entry.ts).or_default().push(idx);
        }

        let mut summary = ImportSummary {
            parsed: parsed.rows.len(),
            skipped: parsed.rows_skipped,
            ..Default::default()
        };

        for row in &parsed.rows {
            match by_ts.get(&row.ts) {
                Some(indices) => {
                    for &idx in indices {
                        staged[idx].set_vitals(row.vitals);
                    }
                    summary.replaced += 1;
                }
                None => {
                    staged.push(Entry::new(row.ts, row.vitals));
                    by_ts.insert(row.ts, vec![staged.len() - 1]);
                    summary.appended += 1;
                }
            }
        }

        self.commit(staged)?;

        tracing::info!(
            parsed = summary.parsed,
            appended = summary.appended,
            replaced = summary.replaced,
            skipped = summary.skipped,
            "CSV imported"
        );
        Ok(summary)
    }

    /// Serialize the collection, newest first
    pub fn export_csv(&self) -> RepositoryResult<CsvExport> {
        let export = transfer::export_csv(&self.entries)?;
        tracing::info!(count = self.entries.len(), "CSV exported");
        Ok(export)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Sort, persist, then swap in the staged collection
    fn commit(&mut self, mut staged: Vec<Entry>) -> RepositoryResult<()> {
        sort_descending(&mut staged);
        self.persistence.save(&staged)?;
        self.entries = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::persistence::tests::BrokenStore;
    use crate::storage::{MemoryStore, SqliteStore, Vital, DEFAULT_STORAGE_KEY};
    use tempfile::tempdir;

    fn create_test_repository() -> EntryRepository {
        EntryRepository::open(Persistence::new(Box::new(MemoryStore::new())))
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    fn assert_sorted_descending(repo: &EntryRepository) {
        let ts: Vec<i64> = repo.entries().iter().map(|e| e.ts).collect();
        let mut sorted = ts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ts, sorted);
    }

    #[test]
    fn test_add_on_empty_collection() {
        let mut repo = create_test_repository();

        let entry = repo.add(1_700_000_000_000, Vitals::new(120, 80, 65)).unwrap();

        assert_eq!(repo.len(), 1);
        let stored = repo.get(&entry.id).unwrap();
        assert_eq!(stored.ts, 1_700_000_000_000);
        assert_eq!(stored.vitals(), Vitals::new(120, 80, 65));
        assert_eq!(
            repo.export_csv().unwrap().content,
            "timestamp,systolic,diastolic,pulse\n1700000000000,120,80,65"
        );
    }

    #[test]
    fn test_add_grows_by_one_and_keeps_order() {
        let mut repo = create_test_repository();

        for (i, ts) in [5_000, 1_000, 9_000, 3_000].into_iter().enumerate() {
            repo.add(ts, Vitals::new(110 + i as i32, 70, 60)).unwrap();
            assert_eq!(repo.len(), i + 1);
            assert_sorted_descending(&repo);
        }
    }

    #[test]
    fn test_add_rejects_each_bound() {
        let mut repo = create_test_repository();
        repo.add(1, Vitals::new(120, 80, 65)).unwrap();

        let invalid = [
            Vitals::new(59, 80, 65),
            Vitals::new(251, 80, 65),
            Vitals::new(120, 39, 65),
            Vitals::new(120, 201, 65),
            Vitals::new(120, 80, 29),
            Vitals::new(120, 80, 201),
        ];

        for vitals in invalid {
            let err = repo.add(2, vitals).unwrap_err();
            assert!(matches!(err, RepositoryError::Validation(_)));
            assert_eq!(repo.len(), 1);
        }
    }

    #[test]
    fn test_edit_replaces_values_keeps_identity() {
        let mut repo = create_test_repository();
        let entry = repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();

        let updated = repo
            .edit(&entry.id, &EditRequest::new(135, 88, 72))
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.ts, 1_000);
        assert_eq!(repo.get(&entry.id).unwrap().vitals(), Vitals::new(135, 88, 72));
    }

    #[test]
    fn test_edit_invalid_leaves_collection_unchanged() {
        let mut repo = create_test_repository();
        let entry = repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();
        let before = repo.entries().to_vec();

        let err = repo
            .edit(&entry.id, &EditRequest::new(120, 80, 500))
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Validation(ValidationError::OutOfRange {
                vital: Vital::Pulse,
                ..
            })
        ));
        assert_eq!(repo.entries(), before.as_slice());
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let mut repo = create_test_repository();
        repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();

        let result = repo.edit("missing", &EditRequest::new(130, 85, 70)).unwrap();

        assert!(result.is_none());
        assert_eq!(repo.entries()[0].vitals(), Vitals::new(120, 80, 65));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut repo = create_test_repository();
        let entry = repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();

        assert!(repo.delete(&entry.id, &no).unwrap().is_none());
        assert_eq!(repo.len(), 1);

        let removed = repo.delete(&entry.id, &yes).unwrap().unwrap();
        assert_eq!(removed.id, entry.id);
        assert!(repo.is_empty());
    }

    #[test]
    fn test_delete_unknown_id_does_not_prompt() {
        let mut repo = create_test_repository();
        repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();

        let prompted = std::cell::Cell::new(false);
        let confirm = |_: &str| {
            prompted.set(true);
            true
        };

        assert!(repo.delete("missing", &confirm).unwrap().is_none());
        assert!(!prompted.get());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_delete_keeps_order() {
        let mut repo = create_test_repository();
        repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();
        let middle = repo.add(2_000, Vitals::new(121, 80, 65)).unwrap();
        repo.add(3_000, Vitals::new(122, 80, 65)).unwrap();

        repo.delete(&middle.id, &yes).unwrap();

        let ts: Vec<i64> = repo.entries().iter().map(|e| e.ts).collect();
        assert_eq!(ts, vec![3_000, 1_000]);
    }

    #[test]
    fn test_import_accepts_out_of_range_rows() {
        let mut repo = create_test_repository();

        let summary = repo
            .import_csv("timestamp,systolic,diastolic,pulse\n1,300,80,60\n2,120,80,65")
            .unwrap();

        assert_eq!(summary.parsed, 2);
        assert_eq!(summary.appended, 2);
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.entries()[1].s, 300);
    }

    #[test]
    fn test_import_matching_timestamp_overwrites() {
        let mut repo = create_test_repository();
        let existing = repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();

        let summary = repo.import_csv("1000,140,90,75").unwrap();

        assert_eq!(summary.replaced, 1);
        assert_eq!(summary.appended, 0);
        assert_eq!(repo.len(), 1);
        let entry = repo.get(&existing.id).unwrap();
        assert_eq!(entry.vitals(), Vitals::new(140, 90, 75));
    }

    #[test]
    fn test_import_duplicate_timestamps_last_row_wins() {
        let mut repo = create_test_repository();

        repo.import_csv("1000,120,80,65\n1000,130,85,70").unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.entries()[0].vitals(), Vitals::new(130, 85, 70));
    }

    #[test]
    fn test_import_merges_and_sorts() {
        let mut repo = create_test_repository();
        repo.add(2_000, Vitals::new(120, 80, 65)).unwrap();

        repo.import_csv("3000,121,81,66\n1000,122,82,67").unwrap();

        assert_eq!(repo.len(), 3);
        assert_sorted_descending(&repo);
    }

    #[test]
    fn test_import_no_valid_rows() {
        let mut repo = create_test_repository();
        repo.add(1_000, Vitals::new(120, 80, 65)).unwrap();
        let before = repo.entries().to_vec();

        let err = repo
            .import_csv("timestamp,systolic,diastolic,pulse\nfoo,bar,baz,qux\n\n")
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NoValidRows));
        assert_eq!(repo.entries(), before.as_slice());
    }

    #[test]
    fn test_import_then_export_round_trip() {
        let mut repo = create_test_repository();
        let csv = "timestamp,systolic,diastolic,pulse\n3000,130,85,70\n2000,125,82,68\n1000,120,80,65";

        repo.import_csv(csv).unwrap();

        assert_eq!(repo.export_csv().unwrap().content, csv);
    }

    #[test]
    fn test_mutations_are_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bpbook.db");

        let kept_id;
        {
            let store = SqliteStore::open(&path).unwrap();
            let mut repo = EntryRepository::open(Persistence::new(Box::new(store)));
            kept_id = repo.add(2_000, Vitals::new(120, 80, 65)).unwrap().id;
            let gone = repo.add(1_000, Vitals::new(121, 81, 66)).unwrap();
            repo.edit(&kept_id, &EditRequest::new(130, 85, 70)).unwrap();
            repo.delete(&gone.id, &yes).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let repo = EntryRepository::open(Persistence::new(Box::new(store)));

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(&kept_id).unwrap().vitals(), Vitals::new(130, 85, 70));
    }

    #[test]
    fn test_open_sorts_stored_entries() {
        let blob = r#"[{"id":"a","ts":1,"s":120,"d":80,"p":65},{"id":"b","ts":2,"s":121,"d":81,"p":66}]"#;
        let store = MemoryStore::new().with(DEFAULT_STORAGE_KEY, blob);

        let repo = EntryRepository::open(Persistence::new(Box::new(store)));

        assert_eq!(repo.entries()[0].id, "b");
    }

    #[test]
    fn test_open_corrupt_store_is_empty() {
        let store = MemoryStore::new().with(DEFAULT_STORAGE_KEY, "[{\"id\":");
        let repo = EntryRepository::open(Persistence::new(Box::new(store)));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let mut repo = EntryRepository::open(Persistence::new(Box::new(BrokenStore)));

        let err = repo.add(1_000, Vitals::new(120, 80, 65)).unwrap_err();

        assert!(matches!(err, RepositoryError::Storage(_)));
        assert!(repo.is_empty());

        let err = repo.import_csv("1000,120,80,65").unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
        assert!(repo.is_empty());
    }
}
