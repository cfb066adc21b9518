//! Transform configuration
//!
//! Field names follow the camelCase shape used by browser-side peer
//! libraries (`maxVideoBitrate`, `opusConfig`, ...), so configuration files
//! can be shared with them. Bitrates are in kilobits per second.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sdp::Params;

/// How a bitrate cap is expressed as `b=` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BandwidthEncoding {
    /// `b=AS:<kbps>` and `b=CT:<kbps>`
    #[default]
    AsAndCt,
    /// `b=TIAS:<bps>`, required by Gecko-based engines
    Tias,
}

impl BandwidthEncoding {
    /// Pick the encoding from a browser identification string
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("Firefox") {
            BandwidthEncoding::Tias
        } else {
            BandwidthEncoding::AsAndCt
        }
    }
}

/// Opus tuning
///
/// `ptime` and `maxptime` become section attributes; every other key is
/// merged into the Opus `a=fmtp` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpusConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxptime: Option<u32>,
    #[serde(flatten)]
    pub params: Params,
}

impl OpusConfig {
    /// Add an fmtp parameter override
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<crate::sdp::Value>) -> Self {
        self.params.insert(key.into(), Some(value.into()));
        self
    }
}

/// Configuration for [`filter_codec_and_bitrate`](super::filter_codec_and_bitrate)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformConfig {
    /// Video bitrate cap; enables the transform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_video_bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_video_bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_video_bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_frame_rate: Option<u32>,
    /// Symmetric audio bitrate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bitrate: Option<u32>,
    /// Opus tuning; enables the transform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opus_config: Option<OpusConfig>,
    /// Channel count; more than two switches to multichannel Opus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opus_channels: Option<u32>,
    pub bandwidth_encoding: BandwidthEncoding,
    /// The host can apply codec preferences per transceiver
    pub native_codec_preferences: bool,
    /// Rewrite codecs in the SDP even when the host has native support
    pub codec_filter_fallback: bool,
}

impl TransformConfig {
    /// Whether codec preferences have to be applied by rewriting the SDP
    pub fn needs_codec_filter(&self) -> bool {
        !self.native_codec_preferences || self.codec_filter_fallback
    }

    pub fn max_video_bitrate(&self) -> Option<u32> {
        nonzero(self.max_video_bitrate)
    }

    pub fn min_video_bitrate(&self) -> Option<u32> {
        nonzero(self.min_video_bitrate)
    }

    pub fn start_video_bitrate(&self) -> Option<u32> {
        nonzero(self.start_video_bitrate)
    }

    pub fn video_frame_rate(&self) -> Option<u32> {
        nonzero(self.video_frame_rate)
    }

    pub fn audio_bitrate(&self) -> Option<u32> {
        nonzero(self.audio_bitrate)
    }

    /// Check the bitrate settings for consistency.
    ///
    /// The transform itself accepts any configuration; this is for callers
    /// that want to reject a bad configuration up front.
    pub fn validate(&self) -> Result<()> {
        let bitrates = [
            ("maxVideoBitrate", self.max_video_bitrate),
            ("minVideoBitrate", self.min_video_bitrate),
            ("startVideoBitrate", self.start_video_bitrate),
            ("videoFrameRate", self.video_frame_rate),
            ("audioBitrate", self.audio_bitrate),
        ];
        for (name, value) in bitrates {
            if value == Some(0) {
                return Err(Error::InvalidConfig(format!("{} must be greater than zero", name)));
            }
        }

        if let (Some(min), Some(max)) = (self.min_video_bitrate, self.max_video_bitrate) {
            if min > max {
                return Err(Error::InvalidConfig(format!(
                    "minVideoBitrate {} exceeds maxVideoBitrate {}",
                    min, max
                )));
            }
        }

        if let Some(start) = self.start_video_bitrate {
            if self.max_video_bitrate.is_some_and(|max| start > max) {
                return Err(Error::InvalidConfig(format!(
                    "startVideoBitrate {} exceeds maxVideoBitrate",
                    start
                )));
            }
            if self.min_video_bitrate.is_some_and(|min| start < min) {
                return Err(Error::InvalidConfig(format!(
                    "startVideoBitrate {} is below minVideoBitrate",
                    start
                )));
            }
        }

        if self.opus_channels == Some(0) {
            return Err(Error::InvalidConfig("opusChannels must be greater than zero".to_string()));
        }

        Ok(())
    }
}

fn nonzero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdp::Value;

    #[test]
    fn test_bandwidth_encoding_from_user_agent() {
        let gecko = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";
        let blink = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
        assert_eq!(BandwidthEncoding::from_user_agent(gecko), BandwidthEncoding::Tias);
        assert_eq!(BandwidthEncoding::from_user_agent(blink), BandwidthEncoding::AsAndCt);
    }

    #[test]
    fn test_config_from_json() {
        let config: TransformConfig = serde_json::from_str(
            r#"{
                "maxVideoBitrate": 2000,
                "opusConfig": { "ptime": 20, "stereo": 1, "usedtx": 1 },
                "bandwidthEncoding": "tias"
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_video_bitrate(), Some(2000));
        assert_eq!(config.bandwidth_encoding, BandwidthEncoding::Tias);
        let opus = config.opus_config.unwrap();
        assert_eq!(opus.ptime, Some(20));
        assert_eq!(opus.maxptime, None);
        assert_eq!(opus.params.len(), 2);
        assert_eq!(opus.params["stereo"], Some(Value::Int(1)));
    }

    #[test]
    fn test_config_from_toml() {
        let config: TransformConfig = toml::from_str(
            r#"
            audioBitrate = 64
            videoFrameRate = 30

            [opusConfig]
            maxptime = 60
            sprop-stereo = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.audio_bitrate(), Some(64));
        assert_eq!(config.video_frame_rate(), Some(30));
        let opus = config.opus_config.unwrap();
        assert_eq!(opus.maxptime, Some(60));
        assert_eq!(opus.params["sprop-stereo"], Some(Value::Int(1)));
    }

    #[test]
    fn test_needs_codec_filter() {
        let mut config = TransformConfig::default();
        assert!(config.needs_codec_filter());
        config.native_codec_preferences = true;
        assert!(!config.needs_codec_filter());
        config.codec_filter_fallback = true;
        assert!(config.needs_codec_filter());
    }

    #[test]
    fn test_zero_means_unset() {
        let config = TransformConfig {
            max_video_bitrate: Some(0),
            ..Default::default()
        };
        assert_eq!(config.max_video_bitrate(), None);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(TransformConfig::default().validate().is_ok());

        let config = TransformConfig {
            max_video_bitrate: Some(2000),
            min_video_bitrate: Some(500),
            start_video_bitrate: Some(800),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = TransformConfig {
            max_video_bitrate: Some(500),
            min_video_bitrate: Some(2000),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = TransformConfig {
            max_video_bitrate: Some(1000),
            start_video_bitrate: Some(1500),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
