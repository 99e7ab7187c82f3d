//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod info;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use emote_config::{CliSettings, Config};
use emote_filter::EmoticonsPlugin;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// Configuration options shared by commands that need the mapping file.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover emote.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plugin directory (overrides config).
    #[arg(long, env = "EMOTE_PLUGINS_DIR")]
    plugins_dir: Option<PathBuf>,

    /// Mapping file (overrides config and plugin directory).
    #[arg(short, long)]
    mappings: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load configuration and build the plugin from it.
    pub(crate) fn plugin(self) -> Result<EmoticonsPlugin, CliError> {
        let cli_settings = CliSettings {
            plugins_dir: self.plugins_dir,
            mappings: self.mappings,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let path = config.emoticons_resolved.mappings_path;
        tracing::info!(mappings = %path.display(), "Using emoticon mappings");
        Ok(EmoticonsPlugin::from_path(path))
    }
}
