use std::collections::BTreeSet;

use anyhow::Result;
use tracing::info;

use crate::store::json_store::JsonStore;

/// Set of completed lesson ids, mirrored to disk on every completion.
pub struct ProgressStore {
    completed: BTreeSet<String>,
    store: Option<JsonStore>,
}

impl ProgressStore {
    /// Without a backing store, progress lives only for this run.
    pub fn load(store: Option<JsonStore>) -> Self {
        let completed = store
            .as_ref()
            .map(|s| s.load_completed_lessons())
            .unwrap_or_default();
        info!(count = completed.len(), "loaded completed lessons");
        Self { completed, store }
    }

    pub fn in_memory() -> Self {
        Self {
            completed: BTreeSet::new(),
            store: None,
        }
    }

    /// Add `lesson_id` and write the full set. Returns whether it was new.
    pub fn mark_complete(&mut self, lesson_id: &str) -> Result<bool> {
        let added = self.completed.insert(lesson_id.to_string());
        if let Some(ref store) = self.store {
            store.save_completed_lessons(&self.completed)?;
        }
        Ok(added)
    }

    pub fn is_complete(&self, lesson_id: &str) -> bool {
        self.completed.contains(lesson_id)
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn count(&self) -> usize {
        self.completed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonStore {
        JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_persisted_set_equals_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let mut progress = ProgressStore::load(Some(store_in(&dir)));

        let calls = ["familia", "saludos", "familia", "numeros", "saludos"];
        for id in calls {
            progress.mark_complete(id).unwrap();
        }

        let reloaded = ProgressStore::load(Some(store_in(&dir)));
        let expected: BTreeSet<String> = calls.iter().map(|s| s.to_string()).collect();
        assert_eq!(reloaded.completed(), &expected);
        assert_eq!(reloaded.count(), 3);
    }

    #[test]
    fn test_mark_complete_reports_novelty() {
        let mut progress = ProgressStore::in_memory();
        assert!(progress.mark_complete("a").unwrap());
        assert!(!progress.mark_complete("a").unwrap());
        assert!(progress.is_complete("a"));
        assert!(!progress.is_complete("b"));
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut progress = ProgressStore::load(Some(store));
        // Removing the data dir makes the temp file write fail.
        std::fs::remove_dir_all(dir.path()).unwrap();
        assert!(progress.mark_complete("a").is_err());
        assert!(progress.is_complete("a"));
    }
}
