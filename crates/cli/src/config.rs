//! Loading transform configuration and JSON inputs from disk

use anyhow::{bail, Context, Result};
use peerwire_sdp_core::TransformConfig;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when no path (or `-`) is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Decode a config file as TOML or JSON, by extension
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&text).with_context(|| format!("Invalid TOML in {}", path.display())),
        Some("json") => serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display())),
        other => bail!(
            "Unsupported config format {:?} for {} (expected .toml or .json)",
            other.unwrap_or(""),
            path.display()
        ),
    }
}

/// Load and validate a transform configuration
pub fn load_transform_config(path: Option<&Path>) -> Result<TransformConfig> {
    let config: TransformConfig = match path {
        Some(path) => load(path)?,
        None => TransformConfig::default(),
    };
    config.validate().context("Invalid transform configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("peerwire-cli-")
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml_config() {
        let file = config_file(".toml", "maxVideoBitrate = 1500\nbandwidthEncoding = \"tias\"\n");
        let config = load_transform_config(Some(file.path())).unwrap();
        assert_eq!(config.max_video_bitrate, Some(1500));
    }

    #[test]
    fn test_load_json_config() {
        let file = config_file(".json", r#"{"opusConfig": {"stereo": 1}}"#);
        let config = load_transform_config(Some(file.path())).unwrap();
        assert!(config.opus_config.is_some());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let file = config_file(".json", r#"{"maxVideoBitrate": 100, "minVideoBitrate": 500}"#);
        assert!(load_transform_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let file = config_file(".yaml", "maxVideoBitrate: 1");
        assert!(load::<TransformConfig>(file.path()).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let file = config_file(".sdp", "v=0\r\ns=-\r\n");
        assert_eq!(read_input(Some(file.path())).unwrap(), "v=0\r\ns=-\r\n");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_transform_config(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn test_default_config() {
        assert_eq!(load_transform_config(None).unwrap(), TransformConfig::default());
    }
}
