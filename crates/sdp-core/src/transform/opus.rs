//! Opus tuning

use tracing::debug;

use super::config::OpusConfig;
use crate::sdp::{merge_params, parse_params, without_params, write_config_params, Fmtp, MediaSection, Params, Value};

const OPUS: &str = "opus";
const MULTIOPUS: &str = "multiopus";

/// Keys carried as `a=ptime` / `a=maxptime` instead of fmtp parameters
const PACKET_TIME_KEYS: &[&str] = &["maxptime", "ptime"];

/// Apply Opus tuning to an audio section whose first codec is Opus.
///
/// The configured parameters are merged over the Opus payload's existing
/// `a=fmtp` parameters (an entry is created if there is none), packet-time
/// keys are moved to the section's `a=ptime` / `a=maxptime`, and a channel
/// count above two switches the codec to `multiopus`.
///
/// Returns the parameters written, or `None` when the section was left
/// alone.
pub fn set_opus_config(media: &mut MediaSection, opus: &OpusConfig, channels: Option<u32>) -> Option<Params> {
    if media.line.media_type != "audio" {
        return None;
    }
    let first = media.fields.rtp.first()?;
    if first.codec != OPUS {
        return None;
    }
    let payload = first.payload.clone();

    let fmtp = match media.fields.fmtp.iter().position(|f| f.payload == payload) {
        Some(idx) => &mut media.fields.fmtp[idx],
        None => {
            media.fields.fmtp.push(Fmtp {
                payload: payload.clone(),
                config: Value::from(""),
            });
            let last = media.fields.fmtp.len() - 1;
            &mut media.fields.fmtp[last]
        }
    };

    let original = parse_params(&fmtp.config.to_string());
    let params = without_params(&merge_params(&original, &opus.params), PACKET_TIME_KEYS);
    fmtp.config = Value::Text(write_config_params(&params));

    if let Some(maxptime) = opus.maxptime.filter(|v| *v > 0) {
        media.fields.maxptime = Some(Value::from(maxptime));
    }
    if let Some(ptime) = opus.ptime.filter(|v| *v > 0) {
        media.fields.ptime = Some(Value::from(ptime));
    }

    if let Some(channels) = channels.filter(|c| *c > 2) {
        if let Some(rtp) = media.fields.rtp.first_mut() {
            rtp.codec = Value::from(MULTIOPUS);
            rtp.encoding = Some(Value::from(channels));
        }
    }

    debug!(payload = %payload, config = %write_config_params(&params), "Applied Opus config");
    Some(params)
}
