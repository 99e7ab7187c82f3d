//! `emote check` command implementation.

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// List every mapping entry.
    #[arg(short, long)]
    list: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the mapping file cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let plugin = self.config.plugin()?;
        let table = plugin.table()?;

        if let Some(path) = plugin.store().path() {
            output.info(&format!("Mapping file: {}", path.display()));
        }
        if self.list {
            for entry in table.entries() {
                output.mapping_entry(&entry.notation, &entry.image);
            }
        }
        for notation in table.duplicates() {
            output.warning(&format!(
                "Warning: {{{notation}}} is mapped more than once, first entry wins"
            ));
        }
        output.success(&format!("{} emoticon mapping(s) loaded", table.len()));
        Ok(())
    }
}
