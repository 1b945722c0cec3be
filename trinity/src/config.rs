//! Parses config file

use std::{
    env,
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use trskl::{OffsetAnchor, ParseOptions, RigIdQuirk};

pub static CONFIG_FILE_NAME: &str = "trinity.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QuirkSetting {
    #[default]
    AdjustThenNormalize,
    NormalizeThenAdjust,
}

impl From<QuirkSetting> for RigIdQuirk {
    fn from(value: QuirkSetting) -> Self {
        match value {
            QuirkSetting::AdjustThenNormalize => RigIdQuirk::AdjustThenNormalize,
            QuirkSetting::NormalizeThenAdjust => RigIdQuirk::NormalizeThenAdjust,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorSetting {
    #[default]
    FieldStart,
    AfterField,
}

impl From<AnchorSetting> for OffsetAnchor {
    fn from(value: AnchorSetting) -> Self {
        match value {
            AnchorSetting::FieldStart => OffsetAnchor::FieldStart,
            AnchorSetting::AfterField => OffsetAnchor::AfterField,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub rig_id_quirk: QuirkSetting,
    pub offset_anchor: AnchorSetting,
}

impl Config {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            rig_id_quirk: self.rig_id_quirk.into(),
            offset_anchor: self.offset_anchor.into(),
        }
    }
}

/// Parse `trinity.toml` in the same folder as the binary. No file means defaults.
pub fn parse_config() -> eyre::Result<Config> {
    let path = match env::current_exe() {
        Ok(path) => path
            .parent()
            .map(|parent| parent.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    parse_config_from_file(path.as_path())
}

pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    let mut file = OpenOptions::new().read(true).open(path.as_os_str())?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    parse_config_from_str(&buffer)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let config: Config = toml::from_str(s)?;

    Ok(config)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = parse_config_from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn full_config() {
        let config = parse_config_from_str(
            "\
rig_id_quirk = \"normalize-then-adjust\"
offset_anchor = \"after-field\"
",
        )
        .unwrap();

        let options = config.parse_options();

        assert_eq!(options.rig_id_quirk, RigIdQuirk::NormalizeThenAdjust);
        assert_eq!(options.offset_anchor, OffsetAnchor::AfterField);
    }

    #[test]
    fn unknown_value() {
        assert!(parse_config_from_str("rig_id_quirk = \"sometimes\"").is_err());
    }
}
