//! Values exchanged with the signaling layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Kind of session description in an offer/answer exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

impl SdpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdpType::Offer => "offer",
            SdpType::Answer => "answer",
            SdpType::Pranswer => "pranswer",
            SdpType::Rollback => "rollback",
        }
    }
}

impl fmt::Display for SdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SdpType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "offer" => Ok(SdpType::Offer),
            "answer" => Ok(SdpType::Answer),
            "pranswer" => Ok(SdpType::Pranswer),
            "rollback" => Ok(SdpType::Rollback),
            other => Err(Error::InvalidSdpType(other.to_string())),
        }
    }
}

/// A session description as handed around by the signaling layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    pub sdp: String,
}

impl Description {
    pub fn new(sdp_type: SdpType, sdp: impl Into<String>) -> Self {
        Self {
            sdp_type,
            sdp: sdp.into(),
        }
    }
}

/// Desired codec for one media kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecPreference {
    /// Codec name as it appears in `a=rtpmap` (`opus`, `H264`, `VP8`, `VP9`)
    pub codec: String,
    /// Substring the codec's format parameters must contain, e.g. an H.264
    /// `profile-level-id` value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Required H.264 `packetization-mode`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

impl CodecPreference {
    pub fn new(codec: impl Into<String>) -> Self {
        Self {
            codec: codec.into(),
            level: None,
            mode: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Codec preferences keyed by media kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferredCodecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<CodecPreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<CodecPreference>,
}

impl PreferredCodecs {
    /// The preference for a media type (`audio` or `video`)
    pub fn for_media(&self, media_type: &str) -> Option<&CodecPreference> {
        match media_type {
            "audio" => self.audio.as_ref(),
            "video" => self.video.as_ref(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.video.is_none()
    }
}

/// A codec the local endpoint can send or receive, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpCodecCapability {
    pub mime_type: String,
    pub clock_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_fmtp_line: Option<String>,
}
