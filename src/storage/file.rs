use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, error, info};

use super::{Shortcode, ShortcodeStore};
use crate::errors::{Result, ShortcoderError};

/// JSON file store: one `<table>.json` document holding every record.
///
/// Records are served from memory; each write rewrites the document while
/// the write lock is held, so writers never interleave.
pub struct FileStore {
    table: String,
    file_path: PathBuf,
    records: RwLock<HashMap<String, Shortcode>>,
}

impl FileStore {
    pub fn open(data_dir: impl AsRef<Path>, table: &str) -> Result<Self> {
        let file_path = data_dir.as_ref().join(format!("{}.json", table));
        let records = Self::load_from_file(&file_path)?;
        info!(
            "FileStore loaded {} shortcodes from {}",
            records.len(),
            file_path.display()
        );

        Ok(Self {
            table: table.to_string(),
            file_path,
            records: RwLock::new(records),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<HashMap<String, Shortcode>> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let list: Vec<Shortcode> = serde_json::from_str(&content).map_err(|e| {
                    error!("Failed to parse {}: {}", path.display(), e);
                    ShortcoderError::serialization(format!("Corrupt shortcode table: {}", e))
                })?;
                Ok(list.into_iter().map(|s| (s.name.clone(), s)).collect())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting empty", path.display());
                Ok(HashMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save_to_file(&self, records: &HashMap<String, Shortcode>) -> Result<()> {
        let mut list: Vec<&Shortcode> = records.values().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        let json = serde_json::to_string_pretty(&list)?;

        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

#[async_trait]
impl ShortcodeStore for FileStore {
    async fn get(&self, name: &str) -> Result<Option<Shortcode>> {
        Ok(self.records.read().get(name).cloned())
    }

    async fn find_by_destination(&self, destination: &str) -> Result<Vec<Shortcode>> {
        let mut found: Vec<Shortcode> = self
            .records
            .read()
            .values()
            .filter(|s| s.destination == destination)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn insert(&self, shortcode: Shortcode) -> Result<()> {
        let mut records = self.records.write();
        if records.contains_key(&shortcode.name) {
            return Err(ShortcoderError::conflict(format!(
                "Shortcode '{}' already exists",
                shortcode.name
            )));
        }
        let name = shortcode.name.clone();
        records.insert(name.clone(), shortcode);
        if let Err(e) = self.save_to_file(&records) {
            records.remove(&name);
            return Err(e);
        }
        Ok(())
    }

    async fn update(&self, shortcode: Shortcode) -> Result<()> {
        let mut records = self.records.write();
        let previous = match records.get_mut(&shortcode.name) {
            Some(existing) => std::mem::replace(existing, shortcode),
            None => {
                return Err(ShortcoderError::not_found(format!(
                    "Shortcode '{}' not found",
                    shortcode.name
                )));
            }
        };
        if let Err(e) = self.save_to_file(&records) {
            records.insert(previous.name.clone(), previous);
            return Err(e);
        }
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let mut records = self.records.write();
        let Some(removed) = records.remove(name) else {
            return Err(ShortcoderError::not_found(format!(
                "Shortcode '{}' not found",
                name
            )));
        };
        if let Err(e) = self.save_to_file(&records) {
            records.insert(removed.name.clone(), removed);
            return Err(e);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn namespace(&self) -> &str {
        &self.table
    }
}
