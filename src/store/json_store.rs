use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

const COMPLETED_LESSONS: &str = "completed_lessons.json";

/// Durable slots under the per-user data directory, one JSON file each.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data dir {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runasimi")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing or unparseable files read as the default value.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(file = %path.display(), error = %e, "discarding malformed data");
                T::default()
            }),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "unreadable data file");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_completed_lessons(&self) -> BTreeSet<String> {
        let ids: Vec<String> = self.load(COMPLETED_LESSONS);
        ids.into_iter().collect()
    }

    pub fn save_completed_lessons(&self, ids: &BTreeSet<String>) -> Result<()> {
        self.save(COMPLETED_LESSONS, ids)
            .context("saving completed lessons")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = make_test_store();
        assert!(store.load_completed_lessons().is_empty());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(COMPLETED_LESSONS), "{not json").unwrap();
        assert!(store.load_completed_lessons().is_empty());

        fs::write(store.file_path(COMPLETED_LESSONS), r#"{"ids": ["a"]}"#).unwrap();
        assert!(store.load_completed_lessons().is_empty());
    }

    #[test]
    fn test_saved_as_plain_json_list() {
        let (_dir, store) = make_test_store();
        let ids: BTreeSet<String> = ["numeros", "saludos"].iter().map(|s| s.to_string()).collect();
        store.save_completed_lessons(&ids).unwrap();

        let raw = fs::read_to_string(store.file_path(COMPLETED_LESSONS)).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec!["numeros".to_string(), "saludos".to_string()]);
        assert_eq!(store.load_completed_lessons(), ids);
    }

    #[test]
    fn test_duplicate_ids_in_file_collapse() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(COMPLETED_LESSONS), r#"["a", "b", "a"]"#).unwrap();
        assert_eq!(store.load_completed_lessons().len(), 2);
    }

    #[test]
    fn test_no_tmp_file_left_after_save() {
        let (dir, store) = make_test_store();
        store.save_completed_lessons(&BTreeSet::new()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }
}
