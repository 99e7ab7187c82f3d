//! Load-once cache around the mapping table.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{LookupError, MappingError};
use crate::mapping::MappingTable;

/// Lazily loaded, immutable mapping table.
///
/// The file is read on the first lookup and the parsed table is reused until
/// [`reload`](Self::reload) is called. A failed load is not cached, so the
/// next lookup tries again.
#[derive(Debug)]
pub struct MappingStore {
    path: Option<PathBuf>,
    table: OnceLock<MappingTable>,
}

impl MappingStore {
    /// Store backed by a mapping file. Nothing is read until first use.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            table: OnceLock::new(),
        }
    }

    /// Store over an already built table.
    #[must_use]
    pub fn from_table(table: MappingTable) -> Self {
        Self {
            path: None,
            table: OnceLock::from(table),
        }
    }

    /// Backing mapping file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a table is currently cached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Cached table, loading it on first access.
    ///
    /// # Errors
    ///
    /// Returns the load error if the mapping file cannot be read or parsed.
    pub fn table(&self) -> Result<&MappingTable, MappingError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }
        let loaded = match &self.path {
            Some(path) => MappingTable::load(path)?,
            None => MappingTable::default(),
        };
        Ok(self.table.get_or_init(|| loaded))
    }

    /// Resolve a notation to its image reference.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Mapping`] if the table cannot be loaded and
    /// [`LookupError::UnknownNotation`] if nothing is mapped to `notation`.
    pub fn lookup_image(&self, notation: &str) -> Result<&str, LookupError> {
        self.table()?.image_for(notation)
    }

    /// Re-read the mapping file and replace the cached table.
    ///
    /// On failure the previous table, if any, stays in place. Stores built
    /// with [`from_table`](Self::from_table) have nothing to reload.
    ///
    /// # Errors
    ///
    /// Returns the load error if the mapping file cannot be read or parsed.
    pub fn reload(&mut self) -> Result<(), MappingError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let table = MappingTable::load(path)?;
        tracing::info!(path = %path.display(), entries = table.len(), "Reloaded emoticon mappings");
        self.table = OnceLock::from(table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_xml(image: &str) -> String {
        format!(
            "<Mappings><Mapping><Notation>{{:)}}</Notation><Image>{image}</Image></Mapping></Mappings>"
        )
    }

    #[test]
    fn test_lazy_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.xml");
        std::fs::write(&path, mapping_xml("smile.png")).unwrap();

        let store = MappingStore::from_path(&path);
        assert!(!store.is_loaded());
        assert_eq!(store.lookup_image("{:)}").unwrap(), "smile.png");
        assert!(store.is_loaded());
    }

    #[test]
    fn test_cached_until_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.xml");
        std::fs::write(&path, mapping_xml("old.png")).unwrap();

        let mut store = MappingStore::from_path(&path);
        assert_eq!(store.lookup_image(":)").unwrap(), "old.png");

        std::fs::write(&path, mapping_xml("new.png")).unwrap();
        assert_eq!(store.lookup_image(":)").unwrap(), "old.png");

        store.reload().unwrap();
        assert_eq!(store.lookup_image(":)").unwrap(), "new.png");
    }

    #[test]
    fn test_failed_reload_keeps_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.xml");
        std::fs::write(&path, mapping_xml("smile.png")).unwrap();

        let mut store = MappingStore::from_path(&path);
        store.table().unwrap();

        std::fs::write(&path, "<Mappings><Mapping>").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.lookup_image(":)").unwrap(), "smile.png");
    }

    #[test]
    fn test_missing_file_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.xml");

        let store = MappingStore::from_path(&path);
        let err = store.lookup_image(":)").unwrap_err();
        assert!(matches!(err, LookupError::Mapping(MappingError::NotFound(_))));
        assert!(!store.is_loaded());

        std::fs::write(&path, mapping_xml("late.png")).unwrap();
        assert_eq!(store.lookup_image(":)").unwrap(), "late.png");
    }

    #[test]
    fn test_from_table() {
        let table = MappingTable::from_entries([(";)", "wink.png")]).unwrap();
        let mut store = MappingStore::from_table(table);
        assert!(store.path().is_none());
        assert!(store.is_loaded());
        store.reload().unwrap();
        assert_eq!(store.lookup_image("{;)}").unwrap(), "wink.png");
        assert!(matches!(
            store.lookup_image(":("),
            Err(LookupError::UnknownNotation(_))
        ));
    }
}
