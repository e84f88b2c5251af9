use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::warn;

use crate::config::FormatterConfig;

/// Runs rendered source through an import formatter (goimports by default).
///
/// Formatting is best effort: the pipeline's result does not depend on it,
/// so a missing or failing formatter degrades to the unformatted text.
pub struct Formatter {
    config: FormatterConfig,
}

impl Formatter {
    pub fn new(config: &FormatterConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub async fn format(&self, source: String, module: &str) -> String {
        if !self.config.enabled {
            return source;
        }

        match self.run(&source, module).await {
            Ok(formatted) => formatted,
            Err(reason) => {
                warn!(%reason, "import formatting failed; returning unformatted output");
                source
            }
        }
    }

    async fn run(&self, source: &str, module: &str) -> std::result::Result<String, String> {
        let mut child = Command::new(&self.config.command)
            .args(["-local", module])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to spawn '{}': {e}", self.config.command))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| "stdin unavailable".to_string())?;
        stdin
            .write_all(source.as_bytes())
            .await
            .map_err(|e| e.to_string())?;
        drop(stdin);

        let output = child.wait_with_output().await.map_err(|e| e.to_string())?;
        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }

        String::from_utf8(output.stdout).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_formatter_passes_text_through() {
        let formatter = Formatter::new(&FormatterConfig {
            enabled: false,
            command: "goimports".to_string(),
        });

        let text = "package mock\n".to_string();
        assert_eq!(formatter.format(text.clone(), "m").await, text);
    }

    #[tokio::test]
    async fn test_missing_binary_degrades_to_unformatted() {
        let formatter = Formatter::new(&FormatterConfig {
            enabled: true,
            command: "mockforge-no-such-formatter".to_string(),
        });

        let text = "package mock\n".to_string();
        assert_eq!(formatter.format(text.clone(), "m").await, text);
    }
}
