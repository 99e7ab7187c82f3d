//! `emote info` command implementation.

use emote_filter::{EmoticonsPlugin, MappingStore, MappingTable};

use crate::output::Output;

/// Execute the info command.
///
/// Identity does not depend on the mappings, so none are loaded.
pub(crate) fn execute() {
    let plugin = EmoticonsPlugin::new(MappingStore::from_table(MappingTable::default()));
    Output::new().plugin_identity(&plugin);
}
