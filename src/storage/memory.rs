use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{Shortcode, ShortcodeStore};
use crate::errors::{Result, ShortcoderError};

/// In-process store backed by a concurrent map.
pub struct MemoryStore {
    table: String,
    records: DashMap<String, Shortcode>,
}

impl MemoryStore {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            records: DashMap::new(),
        }
    }

    pub fn with_records(table: &str, records: impl IntoIterator<Item = Shortcode>) -> Self {
        let store = Self::new(table);
        for record in records {
            store.records.insert(record.name.clone(), record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ShortcodeStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<Shortcode>> {
        Ok(self.records.get(name).map(|r| r.value().clone()))
    }

    async fn find_by_destination(&self, destination: &str) -> Result<Vec<Shortcode>> {
        let mut found: Vec<Shortcode> = self
            .records
            .iter()
            .filter(|r| r.value().destination == destination)
            .map(|r| r.value().clone())
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn insert(&self, shortcode: Shortcode) -> Result<()> {
        match self.records.entry(shortcode.name.clone()) {
            Entry::Occupied(_) => Err(ShortcoderError::conflict(format!(
                "Shortcode '{}' already exists",
                shortcode.name
            ))),
            Entry::Vacant(slot) => {
                slot.insert(shortcode);
                Ok(())
            }
        }
    }

    async fn update(&self, shortcode: Shortcode) -> Result<()> {
        match self.records.get_mut(&shortcode.name) {
            Some(mut existing) => {
                *existing = shortcode;
                Ok(())
            }
            None => Err(ShortcoderError::not_found(format!(
                "Shortcode '{}' not found",
                shortcode.name
            ))),
        }
    }

    async fn remove(&self, name: &str) -> Result<()> {
        match self.records.remove(name) {
            Some(_) => Ok(()),
            None => Err(ShortcoderError::not_found(format!(
                "Shortcode '{}' not found",
                name
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn namespace(&self) -> &str {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_is_write_if_absent() {
        let store = MemoryStore::new("shortcodes");
        store
            .insert(Shortcode::new("abc", "http://x.io", false))
            .await
            .expect("first insert");
        let err = store
            .insert(Shortcode::new("abc", "http://y.io", true))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortcoderError::Conflict(_)));
        let kept = store.get("abc").await.unwrap().unwrap();
        assert_eq!(kept.destination, "http://x.io");
    }

    #[tokio::test]
    async fn test_find_by_destination_is_exact_and_sorted() {
        let store = MemoryStore::with_records(
            "shortcodes",
            [
                Shortcode::new("zeta", "www.yahoo.com", false),
                Shortcode::new("alpha", "www.yahoo.com", true),
                Shortcode::new("other", "www.yahoo.com/", false),
            ],
        );
        let found = store.find_by_destination("www.yahoo.com").await.unwrap();
        let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(store.find_by_destination("nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_remove_missing_are_not_found() {
        let store = MemoryStore::new("shortcodes");
        let err = store
            .update(Shortcode::new("ghost", "http://x.io", false))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortcoderError::NotFound(_)));
        let err = store.remove("ghost").await.unwrap_err();
        assert!(matches!(err, ShortcoderError::NotFound(_)));
    }
}
