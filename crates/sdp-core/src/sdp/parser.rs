//! SDP text parser
//!
//! [`parse`] turns session-description text into a [`SessionDescription`].
//! It never fails: lines that are not of the `<letter>=<content>` shape are
//! dropped, and attribute lines that no specific rule recognizes end up in
//! the `invalid` list of the section they appeared in.
//!
//! The remaining functions split compound field values (payload lists,
//! remote candidates, image attributes, simulcast stream lists) that the
//! grammar keeps as single strings.

use nom::{
    character::complete::{char, satisfy},
    combinator::rest,
    sequence::separated_pair,
    IResult,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::grammar::{Target, GRAMMAR, MEDIA_LINE_TYPE};
use super::params::{insert_param, Params};
use super::records::{MediaLine, Record};
use super::session::{MediaSection, SessionDescription, Slot};
use super::value::Value;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// `<a-z>=<content>`
fn sdp_line(input: &str) -> IResult<&str, (char, &str)> {
    separated_pair(satisfy(|c| c.is_ascii_lowercase()), char('='), rest)(input)
}

/// Split one line into its type letter and content.
///
/// Returns `None` when the line is not of the `<letter>=<content>` shape.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::sdp::parse_line;
///
/// assert_eq!(parse_line("a=rtcp-mux"), Some(('a', "rtcp-mux")));
/// assert_eq!(parse_line("A=upper"), None);
/// assert_eq!(parse_line(""), None);
/// ```
pub fn parse_line(line: &str) -> Option<(char, &str)> {
    sdp_line(line).ok().map(|(_, parsed)| parsed)
}

/// Parse session-description text.
///
/// Each `m=` line opens a new media section; every line after it, up to the
/// next `m=` line, is recorded on that section. Lines before the first `m=`
/// belong to the session.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::sdp::{parse, Value};
///
/// let session = parse("v=0\r\nm=audio 9 UDP/TLS/RTP/SAVPF 111\r\na=ptime:20\r\n");
/// assert_eq!(session.fields.version, Some(Value::Int(0)));
/// assert_eq!(session.media[0].fields.ptime, Some(Value::Int(20)));
/// ```
pub fn parse(text: &str) -> SessionDescription {
    let mut session = SessionDescription::default();

    for line in LINE_BREAK.split(text) {
        let Some((line_type, content)) = parse_line(line) else {
            if !line.is_empty() {
                trace!(line, "Skipping line that is not <type>=<content>");
            }
            continue;
        };

        if line_type == MEDIA_LINE_TYPE {
            session.media.push(MediaSection::default());
        }

        let matched = GRAMMAR
            .rules(line_type)
            .iter()
            .find_map(|rule| rule.captures(content).map(|values| (rule, values)));

        let Some((rule, values)) = matched else {
            trace!(line, "No rule for line");
            continue;
        };

        match rule.target {
            Target::MediaLine => {
                if let Some(section) = session.media.last_mut() {
                    section.line = MediaLine::from_captures(values);
                }
            }
            Target::Singleton(slot) | Target::Repeated(slot) => {
                if slot == Slot::Invalid {
                    trace!(line, "Unrecognized attribute kept verbatim");
                }
                let fields = match session.media.last_mut() {
                    Some(section) => &mut section.fields,
                    None => &mut session.fields,
                };
                fields.store(slot, values);
            }
        }
    }

    session
}

/// Payload numbers of an `m=` line's payload list.
///
/// Non-numeric tokens (the `webrtc-datachannel` style format names of
/// non-RTP sections) are skipped.
pub fn parse_payloads(payloads: &str) -> Vec<i64> {
    payloads
        .split(' ')
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}

/// One `<component> <ip> <port>` entry of `a=remote-candidates`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCandidate {
    pub component: Value,
    pub ip: Value,
    pub port: Value,
}

/// Split an `a=remote-candidates` value into its entries.
///
/// A trailing group of fewer than three tokens is ignored.
pub fn parse_remote_candidates(text: &str) -> Vec<RemoteCandidate> {
    let parts: Vec<Value> = text.split(' ').map(Value::coerce).collect();
    parts
        .chunks_exact(3)
        .map(|chunk| RemoteCandidate {
            component: chunk[0].clone(),
            ip: chunk[1].clone(),
            port: chunk[2].clone(),
        })
        .collect()
}

/// Parse the bracketed attribute sets of an `a=imageattr` field.
///
/// `[x=800,y=640] [x=480,y=320]` yields one parameter map per bracketed set.
pub fn parse_image_attributes(text: &str) -> Vec<Params> {
    text.split(' ')
        .map(|item| {
            let inner = item
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap_or(item);
            let mut params = Params::new();
            for expr in inner.split(',') {
                insert_param(&mut params, expr);
            }
            params
        })
        .collect()
}

/// One simulcast format (RID) in a simulcast stream list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulcastFormat {
    pub scid: Value,
    /// Marked with a leading `~`
    pub paused: bool,
}

/// Parse a simulcast stream list such as `1,~4;2;3`.
///
/// Streams are separated by `;`, alternative formats within a stream by `,`.
pub fn parse_simulcast_stream_list(text: &str) -> Vec<Vec<SimulcastFormat>> {
    text.split(';')
        .map(|stream| {
            stream
                .split(',')
                .map(|format| match format.strip_prefix('~') {
                    Some(scid) => SimulcastFormat {
                        scid: Value::coerce(scid),
                        paused: true,
                    },
                    None => SimulcastFormat {
                        scid: Value::coerce(format),
                        paused: false,
                    },
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFER: &str = "v=0\r\n\
o=- 20518 0 IN IP4 203.0.113.1\r\n\
s= \r\n\
t=0 0\r\n\
c=IN IP4 203.0.113.1\r\n\
a=ice-ufrag:F7gI\r\n\
a=ice-pwd:x9cml/YzichV2+XlhiMu8g\r\n\
a=fingerprint:sha-1 42:89:c5:c6:55:9d:6e:c8:e8:83:55:2a:39:f9:b6:eb:e9:a3:a9:e7\r\n\
m=audio 54400 RTP/SAVPF 0 96\r\n\
a=rtpmap:0 PCMU/8000\r\n\
a=rtpmap:96 opus/48000\r\n\
a=ptime:20\r\n\
a=sendrecv\r\n\
a=candidate:0 1 UDP 2113667327 203.0.113.1 54400 typ host\r\n\
a=candidate:1 2 UDP 2113667326 203.0.113.1 54401 typ host\r\n\
m=video 55400 RTP/SAVPF 97 98\r\n\
a=rtpmap:97 H264/90000\r\n\
a=fmtp:97 profile-level-id=4d0028;packetization-mode=1\r\n\
a=rtpmap:98 VP8/90000\r\n\
a=sendrecv\r\n";

    #[test]
    fn test_parse_session_level() {
        let session = parse(OFFER);
        let origin = session.fields.origin.as_ref().unwrap();
        assert_eq!(origin.username, "-");
        assert_eq!(origin.session_id, 20518);
        assert_eq!(origin.ip_ver, 4);
        assert_eq!(session.fields.name, Some(Value::from(" ")));
        assert_eq!(session.fields.ice_ufrag, Some(Value::from("F7gI")));
        assert_eq!(session.fields.fingerprint.as_ref().unwrap().hash_type, "sha-1");
        assert_eq!(session.media.len(), 2);
    }

    #[test]
    fn test_parse_media_cursor() {
        let session = parse(OFFER);
        let audio = &session.media[0];
        assert_eq!(audio.line.media_type, "audio");
        assert_eq!(audio.line.port, 54400);
        assert_eq!(audio.line.payloads, Some(Value::from("0 96")));
        assert_eq!(audio.fields.rtp.len(), 2);
        assert_eq!(audio.fields.candidates.len(), 2);
        assert_eq!(audio.fields.direction, Some(Value::from("sendrecv")));

        let video = &session.media[1];
        assert_eq!(video.fields.rtp.len(), 2);
        assert_eq!(video.fields.fmtp[0].payload, 97);
        assert!(video.fields.candidates.is_empty());
    }

    #[test]
    fn test_parse_line_endings() {
        let lf = parse(&OFFER.replace("\r\n", "\n"));
        let cr = parse(&OFFER.replace("\r\n", "\r"));
        let crlf = parse(OFFER);
        assert_eq!(lf, crlf);
        assert_eq!(cr, crlf);
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let session = parse("v=0\r\ngarbage\r\nX=upper\r\n=nothing\r\nk=unknown-type\r\ns=-\r\n");
        assert_eq!(session.fields.version, Some(Value::Int(0)));
        assert_eq!(session.fields.name, Some(Value::from("-")));
        assert!(session.fields.invalid.is_empty());
    }

    #[test]
    fn test_parse_catch_all() {
        let session = parse("v=0\r\nm=audio 9 RTP/AVP 0\r\na=some-unknown-attribute-xyz\r\n");
        let invalid = &session.media[0].fields.invalid;
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].value, "some-unknown-attribute-xyz");
    }

    #[test]
    fn test_parse_numeric_coercion() {
        let session = parse("m=audio 9 RTP/AVP 0\r\na=ptime:20\r\na=mid:1a\r\n");
        let fields = &session.media[0].fields;
        assert_eq!(fields.ptime, Some(Value::Int(20)));
        assert_eq!(fields.mid, Some(Value::from("1a")));
    }

    #[test]
    fn test_parse_unmatched_media_line_still_opens_section() {
        let session = parse("m=bogus\r\na=rtcp-mux\r\n");
        assert_eq!(session.media.len(), 1);
        assert_eq!(session.media[0].line, MediaLine::default());
        assert!(session.media[0].fields.rtcp_mux.is_some());
    }

    #[test]
    fn test_parse_empty_input() {
        let session = parse("");
        assert_eq!(session, SessionDescription::default());
        assert!(session.media.is_empty());
    }

    #[test]
    fn test_parse_payloads() {
        assert_eq!(parse_payloads("0 96 97"), vec![0, 96, 97]);
        assert_eq!(parse_payloads("webrtc-datachannel"), Vec::<i64>::new());
    }

    #[test]
    fn test_parse_remote_candidates() {
        let candidates = parse_remote_candidates("1 192.168.1.1 5000 2 192.168.1.1 5001 3");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].component, 1);
        assert_eq!(candidates[0].ip, "192.168.1.1");
        assert_eq!(candidates[1].port, 5001);
    }

    #[test]
    fn test_parse_image_attributes() {
        let attrs = parse_image_attributes("[x=1280,y=720] [x=320,y=180,q=0.5]");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0]["x"], Some(Value::Int(1280)));
        assert_eq!(attrs[1]["q"], Some(Value::from("0.5")));
    }

    #[test]
    fn test_parse_simulcast_stream_list() {
        let streams = parse_simulcast_stream_list("1,~4;2;3");
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].len(), 2);
        assert_eq!(streams[0][1], SimulcastFormat { scid: Value::Int(4), paused: true });
        assert_eq!(streams[2][0], SimulcastFormat { scid: Value::Int(3), paused: false });
    }
}
