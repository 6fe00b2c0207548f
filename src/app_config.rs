use chrono::FixedOffset;
use clap::ArgMatches;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Default, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    version: u8,
    #[serde(default)]
    pub countdown: CountdownConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// The fixed UTC offset, in hours, anchoring the target date's midnight.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Badge width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Badge height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl CountdownConfig {
    /// Converts the configured offset hours into a [`FixedOffset`].
    ///
    /// Fails for offsets outside the representable ±24h window.
    pub fn utc_offset(&self) -> Result<FixedOffset, anyhow::Error> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            anyhow::anyhow!(
                "{hours} is not a valid UTC offset in hours",
                hours = self.utc_offset_hours
            )
        })
    }
}

fn default_utc_offset_hours() -> i32 {
    // The original deployment targeted Japan Standard Time.
    9
}

fn default_width() -> u32 {
    crate::svg::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    crate::svg::DEFAULT_HEIGHT
}

pub fn load_config(config_dir: &Path, matches: &ArgMatches) -> Result<AppConfig, anyhow::Error> {
    let mut config_builder = ConfigBuilder::<DefaultState>::default();

    // Add default configuration.
    config_builder = config_builder
        .add_source(
            File::from(config_dir.join("default.yml"))
                .format(FileFormat::Yaml)
                .required(false),
        )
        .add_source(
            // The YAML FAQ requests `.yaml` to be used as the default.
            File::from(config_dir.join("default.yaml"))
                .format(FileFormat::Yaml)
                .required(false),
        );

    if let Some(path) = matches.get_one::<PathBuf>("config_file").cloned() {
        info!(
            "Loading configuration file from {config_path:?}",
            config_path = path
        );
        config_builder =
            config_builder.add_source(File::from(path).format(FileFormat::Yaml).required(true))
    }

    let config = match config_builder.build() {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to load configuration: {error}", error = e);
            return Err(e.into());
        }
    };

    match config.try_deserialize() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Unable to deserialize configuration: {error}", error = e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_countdown_config_works() {
        let yaml = r#"
            utc_offset_hours: 1
            width: 480
            height: 240
        "#;

        let config: CountdownConfig =
            serde_yaml::from_str(yaml).expect("Failed to deserialize countdown config");
        assert_eq!(config.utc_offset_hours, 1);
        assert_eq!(config.width, 480);
        assert_eq!(config.height, 240);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: CountdownConfig =
            serde_yaml::from_str("{}").expect("Failed to deserialize countdown config");
        assert_eq!(config.utc_offset_hours, 9);
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 160);
    }

    #[test]
    fn offset_conversion_rejects_out_of_range_hours() {
        let config = CountdownConfig {
            utc_offset_hours: 25,
            ..CountdownConfig::default()
        };
        assert!(config.utc_offset().is_err());

        let config = CountdownConfig::default();
        assert_eq!(
            config.utc_offset().unwrap(),
            FixedOffset::east_opt(9 * 3600).unwrap()
        );
    }
}
