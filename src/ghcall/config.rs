//! The optional ghcall configuration file, `$XDG_CONFIG_HOME/ghcall/config.yaml`
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "ghcall";
const CONFIG_FILE: &str = "config.yaml";

/// Settings read from the configuration file. Every field is optional.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub access_token: Option<String>,
    pub base_uri: Option<String>,
}

/// Load the configuration file if there is one
pub fn load() -> Result<Config> {
    let dirs = xdg::BaseDirectories::with_prefix(PREFIX)?;
    match dirs.find_config_file(CONFIG_FILE) {
        Some(path) => load_from(&path),
        None => {
            debug!("No configuration file found");
            Ok(Config::default())
        }
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    debug!("Reading configuration file {}", path.display());
    let f = File::open(path)
        .with_context(|| format!("Error reading configuration file {}", path.display()))?;
    serde_yaml::from_reader(f)
        .with_context(|| format!("Error deserializing configuration file {}", path.display()))
}

/// Where the configuration file is, or would be, for messages
pub fn display_path() -> String {
    match xdg::BaseDirectories::with_prefix(PREFIX) {
        Ok(dirs) => dirs.get_config_file(CONFIG_FILE).display().to_string(),
        Err(_) => format!("$XDG_CONFIG_HOME/{PREFIX}/{CONFIG_FILE}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "access_token: ghp_example\nbase_uri: https://ghe.example.com/api/v3"
        )
        .unwrap();

        let config = load_from(file.path()).unwrap();

        assert_eq!(
            config,
            Config {
                access_token: Some("ghp_example".to_string()),
                base_uri: Some("https://ghe.example.com/api/v3".to_string()),
            }
        );
    }

    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access_token: ghp_example").unwrap();
        let config = load_from(file.path()).unwrap();
        assert_eq!(config.access_token.as_deref(), Some("ghp_example"));
        assert_eq!(config.base_uri, None);
    }

    #[test]
    fn test_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access_token: [unterminated").unwrap();
        let err = load_from(file.path()).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Error deserializing configuration file"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(err.to_string().starts_with("Error reading configuration file"));
    }
}
