//! Colored terminal output utilities.
//!
//! Everything goes to stderr so `emote render` can stream HTML on stdout.

use console::{Style, Term};
use emote_filter::{FilterOutput, TextPlugin};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print one mapping as `{notation}  image`.
    pub(crate) fn mapping_entry(&self, notation: &str, image: &str) {
        let token = format!("{{{notation}}}");
        let _ = self.term.write_line(&format!(
            "  {:<8} {}",
            self.cyan_bold.apply_to(token),
            self.dim.apply_to(image)
        ));
    }

    /// Print counts after a render.
    pub(crate) fn render_summary(&self, result: &FilterOutput) {
        let _ = self.term.write_line(
            &self
                .dim
                .apply_to(format!(
                    "{} translated, {} unescaped",
                    result.translated, result.unescaped
                ))
                .to_string(),
        );
    }

    /// Print the plugin identity fields.
    pub(crate) fn plugin_identity(&self, plugin: &dyn TextPlugin) {
        let _ = self.term.write_line(
            &self
                .cyan_bold
                .apply_to(format!("{} {}", plugin.name(), plugin.version()))
                .to_string(),
        );
        self.info(&format!("id:          {}", plugin.id()));
        self.info(&format!("description: {}", plugin.description()));
    }
}
