//! Host-facing text plugin.

use std::path::PathBuf;

use crate::error::MappingError;
use crate::mapping::MappingTable;
use crate::store::MappingStore;
use crate::translate::{Translation, translate, unescape};

/// A filter the wiki host runs over page HTML after markup rendering.
///
/// Implementations must be shareable across the host's render threads.
pub trait TextPlugin: Send + Sync {
    /// Unique identifier.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// One-line description shown in the host's plugin list.
    fn description(&self) -> &str;

    /// Plugin version.
    fn version(&self) -> &str;

    /// Rewrite rendered HTML. Called once per page, before final output.
    fn after_parse(&self, html: &str) -> String;
}

/// Result of running the emoticon filter over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutput {
    /// Rewritten HTML.
    pub html: String,
    /// Notations replaced by image tags.
    pub translated: usize,
    /// Escaped notations unwrapped to literal text.
    pub unescaped: usize,
    /// Problems that left notations untranslated.
    pub warnings: Vec<String>,
}

/// Replaces emoticon notations such as `{:)}` with image tags.
///
/// Escaped notations such as `[{:)}]` are shown literally as `{:)}`, which is
/// what help pages use to document the syntax.
///
/// # Example
///
/// ```
/// use emote_filter::{EmoticonsPlugin, MappingStore, MappingTable, TextPlugin};
///
/// let table = MappingTable::from_entries([(":)", "smile.png")]).unwrap();
/// let plugin = EmoticonsPlugin::new(MappingStore::from_table(table));
///
/// assert_eq!(
///     plugin.after_parse("Hi {:)}, type [{:)}]"),
///     "Hi <img src='smile.png'/>, type {:)}"
/// );
/// ```
#[derive(Debug)]
pub struct EmoticonsPlugin {
    store: MappingStore,
}

impl EmoticonsPlugin {
    pub const ID: &'static str = "EmoticonsPlugin";
    pub const NAME: &'static str = "Emoticons";
    pub const DESCRIPTION: &'static str =
        "Add Emoticons to your pages using notations such as {:)}, {;)}, etc";
    pub const VERSION: &'static str = "1.0";

    #[must_use]
    pub fn new(store: MappingStore) -> Self {
        Self { store }
    }

    /// Plugin reading its mappings from `path` on first use.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(MappingStore::from_path(path))
    }

    #[must_use]
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Mapping table, loading it if needed.
    ///
    /// # Errors
    ///
    /// Returns the load error if the mapping file cannot be read or parsed.
    pub fn table(&self) -> Result<&MappingTable, MappingError> {
        self.store.table()
    }

    /// Re-read the mapping file after a configuration change.
    ///
    /// # Errors
    ///
    /// Returns the load error; the previous mappings stay active.
    pub fn reload(&mut self) -> Result<(), MappingError> {
        self.store.reload()
    }

    /// Run both stages and report what happened.
    ///
    /// If the mappings cannot be loaded, every plain notation is left as
    /// written and a warning is recorded; escaped notations are still
    /// unwrapped.
    #[must_use]
    pub fn render(&self, html: &str) -> FilterOutput {
        let mut warnings = Vec::new();

        let translation = match self.store.table() {
            Ok(table) => translate(html, table),
            Err(e) => {
                tracing::warn!(error = %e, "Emoticon mappings unavailable, notations left untranslated");
                warnings.push(format!("emoticons not translated: {e}"));
                Translation::untouched(html)
            }
        };
        warnings.extend(
            translation
                .unresolved
                .iter()
                .map(|token| format!("no emoticon mapped for {token}")),
        );

        let unescaped = unescape(&translation.html);

        FilterOutput {
            html: unescaped.html,
            translated: translation.translated,
            unescaped: unescaped.unescaped,
            warnings,
        }
    }
}

impl TextPlugin for EmoticonsPlugin {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn version(&self) -> &str {
        Self::VERSION
    }

    fn after_parse(&self, html: &str) -> String {
        self.render(html).html
    }
}
