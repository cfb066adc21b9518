//! Codec selection
//!
//! Two paths apply a [`CodecPreference`]: [`filter_codecs`] rewrites a parsed
//! media section for hosts without per-transceiver codec preferences, and
//! [`prefer_codec`] narrows a host-reported capability list for hosts that
//! have them.

use tracing::debug;

use super::types::{CodecPreference, RtpCodecCapability};
use crate::sdp::{parse_params, MediaSection, Value};

/// MIME type of a codec name, for the codecs a preference can name
pub fn mime_type_for(codec: &str) -> Option<&'static str> {
    match codec {
        "opus" => Some("audio/opus"),
        "H264" => Some("video/H264"),
        "VP8" => Some("video/VP8"),
        "VP9" => Some("video/VP9"),
        _ => None,
    }
}

/// Restrict a media section to the preferred codec.
///
/// Codec entries are kept by name and format parameters by payload. With a
/// level set, format parameters must also contain the level, and codec
/// entries are narrowed again to those that kept a format-parameter entry.
/// Without a level a codec with no format parameters survives. Feedback
/// entries follow the surviving payloads and the `m=` payload list is
/// rebuilt from them.
pub fn filter_codecs(media: &mut MediaSection, preference: &CodecPreference) {
    let fields = &mut media.fields;
    let level = preference.level.as_deref();

    fields.rtp.retain(|rtp| rtp.codec == preference.codec.as_str());

    let rtp = &fields.rtp;
    fields.fmtp.retain(|fmtp| {
        rtp.iter().any(|r| r.payload == fmtp.payload)
            && match level {
                Some(level) if !fmtp.config.is_empty() => fmtp.config.to_string().contains(level),
                _ => true,
            }
    });

    if level.is_some() {
        let fmtp = &fields.fmtp;
        fields.rtp.retain(|rtp| fmtp.iter().any(|f| f.payload == rtp.payload));
    }

    let payloads: Vec<Value> = media.codec_payloads();
    media
        .fields
        .rtcp_fb
        .retain(|fb| payloads.contains(&fb.payload));

    let joined = payloads
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    debug!(
        media = %media.line.media_type,
        codec = %preference.codec,
        payloads = %joined,
        "Filtered codecs"
    );
    media.line.payloads = Some(Value::Text(joined));
}

/// Narrow host codec capabilities to those matching a preference.
///
/// Capabilities are matched on MIME type. When the preference has a level,
/// a capability must report format parameters containing it (a missing
/// format line excludes the capability), and a preferred packetization
/// mode must appear as an exact `packetization-mode` parameter.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::{prefer_codec, CodecPreference, RtpCodecCapability};
///
/// let caps = vec![
///     RtpCodecCapability {
///         mime_type: "video/VP8".into(),
///         clock_rate: 90000,
///         channels: None,
///         sdp_fmtp_line: None,
///     },
///     RtpCodecCapability {
///         mime_type: "video/H264".into(),
///         clock_rate: 90000,
///         channels: None,
///         sdp_fmtp_line: Some("packetization-mode=1;profile-level-id=42e01f".into()),
///     },
/// ];
/// let preferred = prefer_codec(&caps, &CodecPreference::new("H264").with_level("42e01f"));
/// assert_eq!(preferred.len(), 1);
/// assert_eq!(preferred[0].mime_type, "video/H264");
/// ```
pub fn prefer_codec(
    capabilities: &[RtpCodecCapability],
    preference: &CodecPreference,
) -> Vec<RtpCodecCapability> {
    let Some(mime_type) = mime_type_for(&preference.codec) else {
        debug!(codec = %preference.codec, "No MIME type for preferred codec");
        return Vec::new();
    };

    capabilities
        .iter()
        .filter(|cap| cap.mime_type == mime_type)
        .filter(|cap| matches_level(cap, preference))
        .cloned()
        .collect()
}

fn matches_level(capability: &RtpCodecCapability, preference: &CodecPreference) -> bool {
    let Some(level) = preference.level.as_deref() else {
        return true;
    };
    // Some hosts omit the format line entirely
    let Some(line) = capability.sdp_fmtp_line.as_deref() else {
        return false;
    };
    if !line.contains(level) {
        return false;
    }
    match preference.mode {
        Some(mode) => {
            let wanted = Value::Int(i64::from(mode));
            parse_params(line).get("packetization-mode") == Some(&Some(wanted))
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdp::{Fmtp, RtcpFb, Rtp};

    fn rtp(payload: i64, codec: &str) -> Rtp {
        Rtp {
            payload: Value::Int(payload),
            codec: Value::from(codec),
            rate: Some(Value::Int(90000)),
            encoding: None,
        }
    }

    fn fmtp(payload: i64, config: &str) -> Fmtp {
        Fmtp {
            payload: Value::Int(payload),
            config: Value::coerce(config),
        }
    }

    fn feedback(payload: i64, fb_type: &str) -> RtcpFb {
        RtcpFb {
            payload: Value::Int(payload),
            fb_type: Value::from(fb_type),
            subtype: None,
        }
    }

    fn video_section() -> MediaSection {
        let mut media = MediaSection::default();
        media.line.media_type = Value::from("video");
        media.line.payloads = Some(Value::from("96 97 98 99"));
        media.fields.rtp = vec![rtp(96, "VP8"), rtp(97, "H264"), rtp(98, "H264"), rtp(99, "VP9")];
        media.fields.fmtp = vec![
            fmtp(97, "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f"),
            fmtp(98, "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=640c1f"),
            fmtp(99, "profile-id=0"),
        ];
        media.fields.rtcp_fb = vec![feedback(96, "nack"), feedback(97, "nack"), feedback(98, "goog-remb")];
        media
    }

    #[test]
    fn test_filter_codecs_with_level() {
        let mut media = video_section();
        filter_codecs(&mut media, &CodecPreference::new("H264").with_level("42e01f"));
        assert_eq!(media.codec_payloads(), vec![Value::Int(97)]);
        assert_eq!(media.fields.fmtp.len(), 1);
        assert_eq!(media.fields.fmtp[0].payload, 97);
        assert_eq!(media.fields.rtcp_fb, vec![feedback(97, "nack")]);
        assert_eq!(media.line.payloads, Some(Value::from("97")));
    }

    #[test]
    fn test_filter_codecs_without_level_keeps_bare_codec() {
        let mut media = video_section();
        filter_codecs(&mut media, &CodecPreference::new("VP8"));
        assert_eq!(media.codec_payloads(), vec![Value::Int(96)]);
        assert!(media.fields.fmtp.is_empty());
        assert_eq!(media.fields.rtcp_fb, vec![feedback(96, "nack")]);
        assert_eq!(media.line.payloads, Some(Value::from("96")));
    }

    #[test]
    fn test_filter_codecs_no_match_empties_section() {
        let mut media = video_section();
        filter_codecs(&mut media, &CodecPreference::new("AV1"));
        assert!(media.fields.rtp.is_empty());
        assert!(media.fields.rtcp_fb.is_empty());
        assert_eq!(media.line.payloads, Some(Value::from("")));
    }

    #[test]
    fn test_filter_codecs_prunes_wildcard_feedback() {
        let mut media = video_section();
        media.fields.rtcp_fb.push(RtcpFb {
            payload: Value::from("*"),
            fb_type: Value::from("ccm"),
            subtype: Some(Value::from("fir")),
        });
        filter_codecs(&mut media, &CodecPreference::new("H264"));
        assert_eq!(media.line.payloads, Some(Value::from("97 98")));
        assert_eq!(media.fields.rtcp_fb.len(), 2);
    }

    fn capability(mime_type: &str, fmtp: Option<&str>) -> RtpCodecCapability {
        RtpCodecCapability {
            mime_type: mime_type.to_string(),
            clock_rate: 90000,
            channels: None,
            sdp_fmtp_line: fmtp.map(str::to_string),
        }
    }

    #[test]
    fn test_prefer_codec_by_mime_type() {
        let caps = vec![
            capability("video/VP8", None),
            capability("video/H264", Some("profile-level-id=42e01f")),
            capability("video/VP9", Some("profile-id=0")),
        ];
        let preferred = prefer_codec(&caps, &CodecPreference::new("VP9"));
        assert_eq!(preferred, vec![caps[2].clone()]);
        assert!(prefer_codec(&caps, &CodecPreference::new("AV1")).is_empty());
    }

    #[test]
    fn test_prefer_codec_level_requires_fmtp_line() {
        let caps = vec![
            capability("video/H264", None),
            capability("video/H264", Some("packetization-mode=1;profile-level-id=42e01f")),
        ];
        let preferred = prefer_codec(&caps, &CodecPreference::new("H264").with_level("42e01f"));
        assert_eq!(preferred, vec![caps[1].clone()]);
    }

    #[test]
    fn test_prefer_codec_packetization_mode() {
        let caps = vec![
            capability("video/H264", Some("packetization-mode=0;profile-level-id=42e01f")),
            capability("video/H264", Some("packetization-mode=1;profile-level-id=42e01f")),
            capability("video/H264", Some("packetization-mode=10;profile-level-id=42e01f")),
        ];
        let preferred = prefer_codec(&caps, &CodecPreference::new("H264").with_level("42e01f").with_mode(1));
        assert_eq!(preferred, vec![caps[1].clone()]);

        // Mode is only checked together with a level
        let preferred = prefer_codec(&caps, &CodecPreference::new("H264").with_mode(1));
        assert_eq!(preferred.len(), 3);
    }
}
