use std::path::Path;

use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Config {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut config = todo::Config::load_or_default(root);

        match self.command {
            ConfigCommand::Show => {
                println!("Configuration:");
                println!("  storage_key: {}", config.storage_key());
                println!("  narrow_width: {}", config.narrow_width);
            }
            ConfigCommand::Set { key, value } => {
                match key.as_str() {
                    "storage_key" => config
                        .set_storage_key(value)
                        .map_err(|_| anyhow::anyhow!("storage_key must not be empty"))?,
                    "narrow_width" => {
                        config.narrow_width = value
                            .parse()
                            .map_err(|_| anyhow::anyhow!("narrow_width must be a column count"))?;
                    }
                    _ => anyhow::bail!(
                        "Unknown configuration key: '{key}'\nSupported keys: storage_key, \
                         narrow_width"
                    ),
                }

                std::fs::create_dir_all(root)
                    .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;
                config.save(&root.join("config.toml"))?;
                println!("{}", format!("Set {key}").success());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn set(root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
        Config {
            command: ConfigCommand::Set {
                key: key.to_string(),
                value: value.to_string(),
            },
        }
        .run(root)
    }

    #[test]
    fn set_writes_config_file() {
        let tmp = tempdir().unwrap();

        set(tmp.path(), "storage_key", "groceries").unwrap();
        set(tmp.path(), "narrow_width", "40").unwrap();

        let config = todo::Config::load(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.storage_key(), "groceries");
        assert_eq!(config.narrow_width, 40);
    }

    #[test]
    fn set_rejects_bad_values_and_unknown_keys() {
        let tmp = tempdir().unwrap();

        assert!(set(tmp.path(), "storage_key", "").is_err());
        assert!(set(tmp.path(), "narrow_width", "wide").is_err());
        assert!(set(tmp.path(), "colour", "red").is_err());
        assert!(!tmp.path().join("config.toml").exists());
    }
}
