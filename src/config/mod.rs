use lazy_static::lazy_static;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse config file: {0}")]
    Format(#[from] serde_yml::Error),
}

fn store_seed_file_default() -> Option<String> { return None }

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// YAML mock data loaded on start, relative to the config directory
    #[serde(default="store_seed_file_default")]
    pub seed_file: Option<String>,
}

fn scanner_queue_size_default() -> usize { return 16 }
fn scanner_print_results_default() -> bool { return true }

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ScannerConfig {
    /// Pending payloads between the input and the scan session
    #[serde(default="scanner_queue_size_default")]
    pub queue_size: usize,
    /// Print every scan result as JSON on stdout
    #[serde(default="scanner_print_results_default")]
    pub print_results: bool,
}

fn store_default() -> StoreConfig { return StoreConfig { seed_file: store_seed_file_default() } }
fn scanner_default() -> ScannerConfig {
    return ScannerConfig { queue_size: scanner_queue_size_default(), print_results: scanner_print_results_default() }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default="store_default")]
    pub store: StoreConfig,
    #[serde(default="scanner_default")]
    pub scanner: ScannerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config { store: store_default(), scanner: scanner_default() }
    }
}

impl Config {
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}

pub struct ConfigHolder {
    pub config: Config,
    pub base_path: String,
}

impl ConfigHolder {
    pub fn load() -> Self {
        /* Check for the two paths of the config file */
        for (file, base) in [("config/assetscan.yaml", "config/"), ("assetscan.yaml", "")] {
            if !Path::new(file).exists() {
                continue;
            }
            match Config::from_file(Path::new(file)) {
                Ok(config) => {
                    info!("Config loaded from {}", file);
                    return ConfigHolder { config, base_path: base.to_string() };
                }
                Err(e) => {
                    warn!("Ignoring {}: {}", file, e);
                }
            }
        }

        warn!("No usable config/assetscan.yaml or assetscan.yaml, using defaults");
        ConfigHolder { config: Config::default(), base_path: "".to_string() }
    }

    /// Seed file path resolved against the directory the config came from
    pub fn seed_path(&self) -> Option<String> {
        self.config.store.seed_file.as_ref().map(|f| {
            if Path::new(f).is_absolute() {
                f.clone()
            } else {
                format!("{}{}", self.base_path, f)
            }
        })
    }

    pub fn get_complete_config(&self) -> Config {
        return self.config.clone();
    }
}

lazy_static! {
    pub static ref CONFIG: RwLock<ConfigHolder> = RwLock::new(ConfigHolder::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_sections() {
        let config = Config::from_yaml("store: {}\n").unwrap();
        assert_eq!(config.store.seed_file, None);
        assert_eq!(config.scanner.queue_size, 16);
        assert!(config.scanner.print_results);
        assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_full_config() {
        let yaml = "store:\n  seed_file: mock_data.yaml\nscanner:\n  queue_size: 4\n  print_results: false\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.store.seed_file.as_deref(), Some("mock_data.yaml"));
        assert_eq!(config.scanner.queue_size, 4);
        assert!(!config.scanner.print_results);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Config::from_yaml("scanner: [1, 2]"), Err(ConfigError::Format(_))));
        assert!(matches!(Config::from_file(Path::new("does/not/exist.yaml")), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_seed_path_relative_to_config() {
        let mut config = Config::default();
        config.store.seed_file = Some("mock_data.yaml".to_string());
        let holder = ConfigHolder { config, base_path: "config/".to_string() };
        assert_eq!(holder.seed_path().as_deref(), Some("config/mock_data.yaml"));
    }
}
