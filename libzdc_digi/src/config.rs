use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::constants::DEFAULT_DIGI_TAG;
use super::error::ConfigError;

/// Structure representing the job configuration.
///
/// The only option that changes what the job does is `digi_tag`, the name of the digi
/// collection to read from each event. The paths tell the driver where events come from and
/// where the tables go. Configs are seralizable and deserializable to YAML using serde and
/// serde_yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub digi_tag: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for Config {
    /// Generate a new Config object. The paths will be empty/invalid
    fn default() -> Self {
        Self {
            digi_tag: String::from(DEFAULT_DIGI_TAG),
            input_path: PathBuf::from("None"),
            output_path: PathBuf::from("None"),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;
        let config = serde_yaml::from_str::<Self>(&yaml_str)?;
        if config.digi_tag.trim().is_empty() {
            return Err(ConfigError::EmptyTag);
        }
        Ok(config)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        std::fs::write(config_path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn input_exists(&self) -> bool {
        self.input_path.exists()
    }

    /// Get the path to the output hdf5 file, checking that its directory exists
    pub fn get_output_file(&self) -> Result<PathBuf, ConfigError> {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                Err(ConfigError::BadFilePath(parent.to_path_buf()))
            }
            _ => Ok(self.output_path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let config = Config {
            digi_tag: String::from("zdcdigis"),
            input_path: dir.path().join("events.yml"),
            output_path: dir.path().join("zdc.h5"),
        };
        config.write_config_file(&path).unwrap();
        assert_eq!(Config::read_config_file(&path).unwrap(), config);
        assert!(!config.input_exists());
        assert_eq!(config.get_output_file().unwrap(), dir.path().join("zdc.h5"));
    }

    #[test]
    fn test_rejects_unknown_and_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "digi_tag: castorDigis\ninput_path: a.yml\noutput_path: b.h5\nn_threads: 4\n",
        )
        .unwrap();
        assert!(matches!(
            Config::read_config_file(&path),
            Err(ConfigError::ParsingError(_))
        ));

        std::fs::write(&path, "digi_tag: ' '\ninput_path: a.yml\noutput_path: b.h5\n").unwrap();
        assert!(matches!(
            Config::read_config_file(&path),
            Err(ConfigError::EmptyTag)
        ));

        assert!(matches!(
            Config::read_config_file(&dir.path().join("missing.yml")),
            Err(ConfigError::BadFilePath(_))
        ));
    }

    #[test]
    fn test_default_tag() {
        assert_eq!(Config::default().digi_tag, "castorDigis");
    }

    #[test]
    fn test_output_directory_must_exist() {
        let config = Config {
            output_path: PathBuf::from("/definitely/not/here/zdc.h5"),
            ..Default::default()
        };
        assert!(config.get_output_file().is_err());
    }
}
