//! Bitrate caps
//!
//! A cap is written twice: as `x-google-*-bitrate` hints merged into every
//! `a=fmtp` entry of the section, and as the section's `b=` lines.

use tracing::debug;

use super::config::{BandwidthEncoding, TransformConfig};
use crate::sdp::{merge_params, parse_params, write_config_params, Bandwidth, MediaSection, Params, Value};

const MIN_BITRATE: &str = "x-google-min-bitrate";
const MAX_BITRATE: &str = "x-google-max-bitrate";
const START_BITRATE: &str = "x-google-start-bitrate";

/// Bandwidth hints for a min/max pair, plus a start bitrate when given
pub fn google_bandwidth(min: Option<u32>, max: u32, start: Option<u32>) -> Params {
    let mut params = Params::new();
    if let Some(min) = min {
        params.insert(MIN_BITRATE.to_string(), Some(Value::from(min)));
    }
    params.insert(MAX_BITRATE.to_string(), Some(Value::from(max)));
    if let Some(start) = start {
        params.insert(START_BITRATE.to_string(), Some(Value::from(start)));
    }
    params
}

/// `b=` lines capping a section at `max` kbps
pub fn bandwidth_lines(max: u32, encoding: BandwidthEncoding) -> Vec<Bandwidth> {
    let line = |bandwidth_type: &str, limit: Value| Bandwidth {
        bandwidth_type: Value::from(bandwidth_type),
        limit,
    };
    match encoding {
        BandwidthEncoding::Tias => vec![line("TIAS", Value::Int(i64::from(max) * 1000))],
        BandwidthEncoding::AsAndCt => vec![line("AS", Value::from(max)), line("CT", Value::from(max))],
    }
}

/// Merge `hints` into every format-parameter entry of the section
fn merge_into_fmtp(media: &mut MediaSection, hints: &Params) {
    for fmtp in &mut media.fields.fmtp {
        let merged = if fmtp.config.is_empty() {
            hints.clone()
        } else {
            merge_params(&parse_params(&fmtp.config.to_string()), hints)
        };
        fmtp.config = Value::Text(write_config_params(&merged));
    }
}

/// Apply the configured bitrate caps to an audio or video section.
///
/// Nothing is written unless `maxVideoBitrate` is set. With it, audio gets a
/// symmetric cap from `audioBitrate`, and video gets the min/max/start hints
/// plus `a=framerate` when `videoFrameRate` is set. Other media types are
/// untouched.
pub fn set_max_bitrate(media: &mut MediaSection, config: &TransformConfig) {
    let Some(max) = config.max_video_bitrate() else {
        return;
    };

    if media.line.media_type == "audio" {
        if let Some(bitrate) = config.audio_bitrate() {
            merge_into_fmtp(media, &google_bandwidth(Some(bitrate), bitrate, None));
            media.fields.bandwidth = bandwidth_lines(bitrate, config.bandwidth_encoding);
            debug!(bitrate, "Capped audio bitrate");
        }
    } else if media.line.media_type == "video" {
        let hints = google_bandwidth(config.min_video_bitrate(), max, config.start_video_bitrate());
        merge_into_fmtp(media, &hints);
        media.fields.bandwidth = bandwidth_lines(max, config.bandwidth_encoding);
        debug!(max, hints = %write_config_params(&hints), "Capped video bitrate");
        if let Some(frame_rate) = config.video_frame_rate() {
            media.fields.framerate = Some(Value::from(frame_rate));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdp::Fmtp;

    fn section(media_type: &str, configs: &[&str]) -> MediaSection {
        let mut media = MediaSection::default();
        media.line.media_type = Value::from(media_type);
        media.fields.fmtp = configs
            .iter()
            .enumerate()
            .map(|(i, config)| Fmtp {
                payload: Value::Int(96 + i as i64),
                config: Value::from(*config),
            })
            .collect();
        media
    }

    #[test]
    fn test_google_bandwidth() {
        assert_eq!(
            write_config_params(&google_bandwidth(Some(500), 2000, Some(800))),
            "x-google-min-bitrate=500;x-google-max-bitrate=2000;x-google-start-bitrate=800"
        );
        assert_eq!(write_config_params(&google_bandwidth(None, 2000, None)), "x-google-max-bitrate=2000");
    }

    #[test]
    fn test_bandwidth_lines() {
        let tias = bandwidth_lines(2000, BandwidthEncoding::Tias);
        assert_eq!(tias.len(), 1);
        assert_eq!(tias[0].bandwidth_type, "TIAS");
        assert_eq!(tias[0].limit, 2_000_000);

        let as_ct = bandwidth_lines(2000, BandwidthEncoding::AsAndCt);
        let types: Vec<String> = as_ct.iter().map(|b| b.bandwidth_type.to_string()).collect();
        assert_eq!(types, vec!["AS", "CT"]);
        assert!(as_ct.iter().all(|b| b.limit == 2000));
    }

    #[test]
    fn test_video_cap() {
        let mut media = section("video", &["profile-level-id=42e01f", ""]);
        let config = TransformConfig {
            max_video_bitrate: Some(2000),
            min_video_bitrate: Some(500),
            video_frame_rate: Some(30),
            ..Default::default()
        };
        set_max_bitrate(&mut media, &config);
        assert_eq!(
            media.fields.fmtp[0].config,
            "profile-level-id=42e01f;x-google-min-bitrate=500;x-google-max-bitrate=2000"
        );
        assert_eq!(
            media.fields.fmtp[1].config,
            "x-google-min-bitrate=500;x-google-max-bitrate=2000"
        );
        assert_eq!(media.fields.bandwidth.len(), 2);
        assert_eq!(media.fields.framerate, Some(Value::Int(30)));
    }

    #[test]
    fn test_existing_hints_replaced_in_place() {
        let mut media = section("video", &["x-google-max-bitrate=100;apt=96"]);
        let config = TransformConfig {
            max_video_bitrate: Some(1500),
            ..Default::default()
        };
        set_max_bitrate(&mut media, &config);
        assert_eq!(media.fields.fmtp[0].config, "x-google-max-bitrate=1500;apt=96");
    }

    #[test]
    fn test_audio_cap() {
        let mut media = section("audio", &["minptime=10;useinbandfec=1"]);
        let config = TransformConfig {
            audio_bitrate: Some(64),
            max_video_bitrate: Some(2000),
            bandwidth_encoding: BandwidthEncoding::Tias,
            ..Default::default()
        };
        set_max_bitrate(&mut media, &config);
        assert_eq!(
            media.fields.fmtp[0].config,
            "minptime=10;useinbandfec=1;x-google-min-bitrate=64;x-google-max-bitrate=64"
        );
        assert_eq!(media.fields.bandwidth[0].limit, 64_000);
        assert_eq!(media.fields.framerate, None);
    }

    #[test]
    fn test_no_video_cap_writes_nothing() {
        let config = TransformConfig {
            audio_bitrate: Some(64),
            video_frame_rate: Some(30),
            ..Default::default()
        };

        let mut audio = section("audio", &["minptime=10"]);
        let before = audio.clone();
        set_max_bitrate(&mut audio, &config);
        assert_eq!(audio, before);

        let mut video = section("video", &["profile-level-id=42e01f"]);
        let before = video.clone();
        set_max_bitrate(&mut video, &config);
        assert_eq!(video, before);
    }

    #[test]
    fn test_other_media_untouched() {
        let mut media = section("application", &["x=1"]);
        let config = TransformConfig {
            audio_bitrate: Some(64),
            max_video_bitrate: Some(2000),
            video_frame_rate: Some(30),
            ..Default::default()
        };
        let before = media.clone();
        set_max_bitrate(&mut media, &config);
        assert_eq!(media, before);
    }
}
