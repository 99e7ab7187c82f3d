//! `emote render` command implementation.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// HTML file to read (default: stdin).
    input: Option<PathBuf>,

    /// Write the result to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail if any notation is left untranslated.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or I/O fails, or in strict mode when
    /// notations were left untranslated.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let plugin = self.config.plugin()?;

        let html = read_input(self.input.as_deref())?;
        let result = plugin.render(&html);

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        if self.strict && !result.warnings.is_empty() {
            return Err(CliError::Validation(format!(
                "{} problem(s) left notations untranslated",
                result.warnings.len()
            )));
        }

        write_output(self.output.as_deref(), &result.html)?;
        output.render_summary(&result);
        Ok(())
    }
}

/// Read the document from `path`, or stdin when absent.
fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut html = String::new();
            io::stdin().lock().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}

/// Write the document to `path`, or stdout when absent.
fn write_output(path: Option<&Path>, html: &str) -> io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, html),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()
        }
    }
}
