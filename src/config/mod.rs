use crate::models::Settings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the settings file inside the config directory
pub const SETTINGS_FILE: &str = "Action Transfer.yaml";

/// Prefix of environment variables that override settings,
/// e.g. `ACTION_TRANSFER_DEBUG_MODE=true`
pub const ENV_PREFIX: &str = "ACTION_TRANSFER";

/// Configuration manager for the tool's settings file.
///
/// Settings are layered: built-in defaults, then `Action Transfer.yaml` if present,
/// then `ACTION_TRANSFER_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing the settings file
    ///
    /// # Returns
    /// A new ConfigManager instance
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        })
    }

    /// Load settings from the file and environment.
    ///
    /// # Returns
    /// The layered Settings; defaults fill anything not set
    pub fn load_settings(&self) -> Result<Settings> {
        self.load_settings_with_env(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Load settings with an explicit environment source (tests inject their own)
    pub fn load_settings_with_env(&self, env: config::Environment) -> Result<Settings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let settings: Settings = config::Config::builder()
            .add_source(
                config::File::from(self.settings_path.as_std_path())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Save the settings file.
    ///
    /// # Arguments
    /// * `settings` - The Settings to save
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MappingFormat;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults_without_file() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = manager.load_settings_with_env(env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_save_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let settings = Settings {
            prefix_src: "mixamorig:".to_string(),
            mapping_format: MappingFormat::Json,
            ..Settings::default()
        };
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings_with_env(env(&[])).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_env_overrides_file() {
        let (manager, _temp_dir) = create_test_config_manager();
        manager.save_settings(&Settings::default()).unwrap();

        let loaded = manager
            .load_settings_with_env(env(&[("ACTION_TRANSFER_DEBUG_MODE", "true")]))
            .unwrap();
        assert!(loaded.debug_mode);
        assert_eq!(loaded.log_dir, "logs");
    }
}
