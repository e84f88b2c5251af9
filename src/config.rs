use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MockforgeError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source acquisition settings
    pub source: SourceConfig,

    /// Post-processing of rendered output
    pub formatter: FormatterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Go toolchain binary used to fetch and locate modules
    pub go_binary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Whether to run rendered output through the import formatter
    pub enabled: bool,

    /// Formatter binary; reads source on stdin, writes formatted source to stdout
    pub command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                go_binary: "go".to_string(),
            },
            formatter: FormatterConfig {
                enabled: true,
                command: "goimports".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| MockforgeError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| MockforgeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = ["Mockforge.toml", "mockforge.toml", ".mockforge.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}
