//! # peerwire-sdp-core
//!
//! Session Description Protocol handling for peerwire:
//!
//! - [`sdp`]: a declarative grammar table driving both the parser and the
//!   writer, covering the attribute set browsers actually emit, with a
//!   catch-all bucket for anything else.
//! - [`transform`]: the codec/bitrate transform that rewrites an offer or
//!   answer to enforce codec preferences, Opus tuning and bandwidth caps.
//!
//! ## Usage
//!
//! ```rust
//! use peerwire_sdp_core::{parse, write};
//!
//! let text = "v=0\r\ns=-\r\nm=audio 9 RTP/AVP 0\r\na=rtpmap:0 PCMU/8000\r\n";
//! let session = parse(text);
//! assert_eq!(session.media[0].fields.rtp[0].codec, "PCMU");
//! assert_eq!(write(&session), text);
//! ```
//!
//! Every operation is a pure function; the grammar table is built once and
//! shared read-only, so all of them can be called from any thread.

pub mod error;
pub mod sdp;
pub mod transform;

pub use error::{Error, Result};
pub use sdp::{parse, write, write_with, MediaSection, SessionDescription, Value, WriteOptions};
pub use transform::{
    filter_bitrate, filter_codec_and_bitrate, prefer_codec, BandwidthEncoding, CodecPreference,
    Description, PreferredCodecs, RtpCodecCapability, SdpType, TransformConfig,
};
