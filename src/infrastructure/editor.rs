use crate::application::variables::Environment;
use anyhow::{Context, Result, bail};
use tokio::process::Command;

const FALLBACK_EDITOR: &str = "vi";

/// Collects freeform text by opening the user's editor on a temporary file
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    /// `explicit` wins, then `$EDITOR`, then `vi`
    pub fn resolve(explicit: Option<&str>, env: &dyn Environment) -> Self {
        let command = explicit
            .map(str::to_string)
            .filter(|c| !c.trim().is_empty())
            .or_else(|| env.var("EDITOR").filter(|c| !c.trim().is_empty()))
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());
        Self { command }
    }

    #[cfg(test)]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Opens the editor on a file holding `initial` and returns the saved text
    ///
    /// Blocks until the editor exits.
    pub async fn edit(&self, initial: &str) -> Result<String> {
        let file = tempfile::Builder::new()
            .prefix("courier-req")
            .suffix(".http")
            .tempfile()
            .context("Failed to create temporary request file")?;
        std::fs::write(file.path(), initial)?;

        let script = format!("{} '{}'", self.command, file.path().display());
        tracing::debug!("running editor: sh -c {}", script);
        let status = Command::new("sh")
            .arg("-c")
            .arg(&script)
            .status()
            .await
            .with_context(|| format!("Failed to run editor '{}'", self.command))?;
        if !status.success() {
            bail!("Editor '{}' exited with {}", self.command, status);
        }

        std::fs::read_to_string(file.path()).context("Failed to read edited request")
    }
}
