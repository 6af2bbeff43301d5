use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ClientError, ClientResult};

/// Local client storage for the chosen language
pub trait Preferences: Send + Sync {
    /// The saved language code, if any
    fn language(&self) -> Option<String>;

    /// Persist the chosen language code
    fn set_language(&self, code: &str) -> ClientResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(rename = "currentLang", default, skip_serializing_if = "Option::is_none")]
    current_lang: Option<String>,
}

/// Preferences kept in a small JSON file (`{"currentLang": "en"}`)
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<StoredPreferences> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl Preferences for FilePreferences {
    fn language(&self) -> Option<String> {
        self.read()?
            .current_lang
            .filter(|code| !code.is_empty())
    }

    fn set_language(&self, code: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(format!("{}: {}", parent.display(), e)))?;
        }

        let mut stored = self.read().unwrap_or_default();
        stored.current_lang = Some(code.to_string());

        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

/// Preferences held in memory only
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    language: Mutex<Option<String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(code: &str) -> Self {
        Self {
            language: Mutex::new(Some(code.to_string())),
        }
    }
}

impl Preferences for MemoryPreferences {
    fn language(&self) -> Option<String> {
        self.language
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn set_language(&self, code: &str) -> ClientResult<()> {
        let mut guard = self
            .language
            .lock()
            .map_err(|_| ClientError::Storage("preferences lock poisoned".to_string()))?;
        *guard = Some(code.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_preferences_missing_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let prefs = FilePreferences::new(temp_dir.path().join("prefs.json"));
        assert_eq!(prefs.language(), None);
    }

    #[test]
    fn test_file_preferences_roundtrip_creates_directories() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("nested").join("dir").join("prefs.json");
        let prefs = FilePreferences::new(&path);

        prefs.set_language("en").expect("save");
        assert_eq!(prefs.language().as_deref(), Some("en"));

        // A fresh handle sees the persisted value, as across sessions
        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.language().as_deref(), Some("en"));

        let raw = std::fs::read_to_string(&path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["currentLang"], "en");
    }

    #[test]
    fn test_file_preferences_ignores_corrupt_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").expect("write");

        let prefs = FilePreferences::new(&path);
        assert_eq!(prefs.language(), None);

        prefs.set_language("de").expect("overwrite");
        assert_eq!(prefs.language().as_deref(), Some("de"));
    }

    #[test]
    fn test_file_preferences_empty_code_is_unset() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"currentLang": ""}"#).expect("write");

        assert_eq!(FilePreferences::new(&path).language(), None);
    }

    #[test]
    fn test_file_preferences_unwritable_path() {
        let temp_dir = TempDir::new().expect("temp dir");
        // A regular file where a directory is expected
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "x").expect("write");

        let prefs = FilePreferences::new(blocker.join("prefs.json"));
        assert!(matches!(
            prefs.set_language("en"),
            Err(ClientError::Storage(_))
        ));
    }

    #[test]
    fn test_memory_preferences() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.language(), None);
        prefs.set_language("fr").unwrap();
        assert_eq!(prefs.language().as_deref(), Some("fr"));

        let seeded = MemoryPreferences::with_language("ja");
        assert_eq!(seeded.language().as_deref(), Some("ja"));
    }
}
