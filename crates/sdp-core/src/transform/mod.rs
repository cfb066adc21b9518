//! Codec and bitrate transform
//!
//! [`filter_codec_and_bitrate`] rewrites an offer or answer before it goes
//! out over signaling. For every audio and video section it can:
//!
//! - restrict the codecs to the preferred one ([`codec::filter_codecs`]),
//!   for hosts that cannot apply codec preferences natively
//! - tune Opus ([`opus::set_opus_config`])
//! - cap the bitrate ([`bitrate::set_max_bitrate`])
//!
//! The description is only parsed and rewritten when one of these is
//! requested; otherwise it is returned untouched.

pub mod bitrate;
pub mod codec;
pub mod config;
pub mod opus;
pub mod types;

use tracing::debug;

use crate::sdp::{parse, write};

pub use codec::{filter_codecs, mime_type_for, prefer_codec};
pub use config::{BandwidthEncoding, OpusConfig, TransformConfig};
pub use types::{CodecPreference, Description, PreferredCodecs, RtpCodecCapability, SdpType};

/// Apply codec preferences, Opus tuning and bitrate caps to a description.
///
/// The transform runs when codec filtering is needed (preferences given and
/// the host lacks native support, or the fallback is forced), when a video
/// bitrate cap is set, or when Opus tuning is set. A media kind without a
/// preference keeps its codecs. The audio cap and frame rate ride on the
/// video cap: without `maxVideoBitrate` neither is written.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::{filter_codec_and_bitrate, Description, SdpType, TransformConfig};
///
/// let offer = Description::new(SdpType::Offer, "v=0\r\ns=-\r\nm=video 9 RTP/AVP 96\r\na=rtpmap:96 VP8/90000\r\n");
/// let config = TransformConfig {
///     max_video_bitrate: Some(1000),
///     ..Default::default()
/// };
/// let offer = filter_codec_and_bitrate(offer, None, &config);
/// assert!(offer.sdp.contains("b=AS:1000\r\nb=CT:1000\r\n"));
/// ```
pub fn filter_codec_and_bitrate(
    mut description: Description,
    preferred: Option<&PreferredCodecs>,
    config: &TransformConfig,
) -> Description {
    let preferred = preferred.filter(|p| !p.is_empty() && config.needs_codec_filter());

    if preferred.is_none() && config.max_video_bitrate().is_none() && config.opus_config.is_none() {
        return description;
    }

    let mut session = parse(&description.sdp);

    for media in &mut session.media {
        let media_type = media.line.media_type.to_string();
        if media_type != "audio" && media_type != "video" {
            continue;
        }

        if let Some(preferred) = preferred {
            match preferred.for_media(&media_type) {
                Some(preference) => filter_codecs(media, preference),
                None => debug!(media = %media_type, "No codec preference, keeping codecs"),
            }
        }

        if let Some(opus) = &config.opus_config {
            opus::set_opus_config(media, opus, config.opus_channels);
        }

        if config.max_video_bitrate().is_some() {
            bitrate::set_max_bitrate(media, config);
        }
    }

    description.sdp = write(&session);
    description
}

/// Apply only the bitrate and Opus settings of `config`
pub fn filter_bitrate(description: Description, config: &TransformConfig) -> Description {
    filter_codec_and_bitrate(description, None, config)
}
