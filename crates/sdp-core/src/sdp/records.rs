//! Typed records for SDP lines with named fields
//!
//! Each record's field order matches the capture-group order of its grammar
//! rule in [`grammar`](super::grammar). Fields captured by an optional group
//! are `Option<Value>`; all others are always present after a parse (possibly
//! as empty text).

use super::value::Value;

/// A record that can be built from, and flattened back into, the positional
/// captures of a grammar rule.
pub trait Record: Sized {
    /// Build the record from captures in field order
    fn from_captures(values: Vec<Option<Value>>) -> Self;

    /// Flatten the record into writer arguments in field order
    fn to_args(&self) -> Vec<Option<Value>>;
}

/// Single-value lines (`s=`, `a=mid:`, `a=ptime:`, ...) store the bare value.
impl Record for Value {
    fn from_captures(values: Vec<Option<Value>>) -> Self {
        values.into_iter().next().flatten().unwrap_or_default()
    }

    fn to_args(&self) -> Vec<Option<Value>> {
        vec![Some(self.clone())]
    }
}

/// A record field: either always captured or captured by an optional group
pub trait FieldValue {
    /// Convert a capture into the field
    fn from_capture(value: Option<Value>) -> Self;

    /// Convert the field back into a writer argument
    fn to_arg(&self) -> Option<Value>;
}

impl FieldValue for Value {
    fn from_capture(value: Option<Value>) -> Self {
        value.unwrap_or_default()
    }

    fn to_arg(&self) -> Option<Value> {
        Some(self.clone())
    }
}

impl FieldValue for Option<Value> {
    fn from_capture(value: Option<Value>) -> Self {
        value
    }

    fn to_arg(&self) -> Option<Value> {
        self.clone()
    }
}

sdp_record! {
    /// `o=<username> <sess-id> <sess-version> <nettype> IP<ver> <address>`
    pub struct Origin {
        pub username: Value,
        pub session_id: Value,
        pub session_version: Value,
        pub net_type: Value,
        pub ip_ver: Value,
        pub address: Value,
    }
}

sdp_record! {
    /// `t=<start> <stop>`
    pub struct Timing {
        pub start: Value,
        pub stop: Value,
    }
}

sdp_record! {
    /// `c=IN IP<ver> <address>`
    pub struct Connection {
        pub version: Value,
        pub ip: Value,
    }
}

sdp_record! {
    /// `b=<type>:<limit>`
    pub struct Bandwidth {
        #[serde(rename = "type")]
        pub bandwidth_type: Value,
        pub limit: Value,
    }
}

sdp_record! {
    /// The `m=<type> <port> <proto> <payloads>` line of a media section
    pub struct MediaLine {
        #[serde(rename = "type")]
        pub media_type: Value,
        pub port: Value,
        pub protocol: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub payloads: Option<Value>,
    }
}

sdp_record! {
    /// `a=rtpmap:<payload> <codec>[/<rate>[/<encoding>]]`
    pub struct Rtp {
        pub payload: Value,
        pub codec: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub rate: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub encoding: Option<Value>,
    }
}

sdp_record! {
    /// `a=fmtp:<payload> <config>`
    pub struct Fmtp {
        pub payload: Value,
        pub config: Value,
    }
}

sdp_record! {
    /// `a=rtcp:<port>[ <nettype> IP<ver> <address>]`
    pub struct Rtcp {
        pub port: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub net_type: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub ip_ver: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub address: Option<Value>,
    }
}

sdp_record! {
    /// `a=rtcp-fb:<payload> trr-int <value>`
    pub struct RtcpFbTrrInt {
        pub payload: Value,
        pub value: Value,
    }
}

sdp_record! {
    /// `a=rtcp-fb:<payload> <type>[ <subtype>]`
    pub struct RtcpFb {
        pub payload: Value,
        #[serde(rename = "type")]
        pub fb_type: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub subtype: Option<Value>,
    }
}

sdp_record! {
    /// `a=extmap:<value>[/<direction>][ <encrypt-uri>] <uri>[ <config>]`
    pub struct Ext {
        pub value: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub direction: Option<Value>,
        #[serde(rename = "encrypt-uri", skip_serializing_if = "Option::is_none")]
        pub encrypt_uri: Option<Value>,
        pub uri: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub config: Option<Value>,
    }
}

sdp_record! {
    /// `a=crypto:<id> <suite> <config>[ <session-config>]`
    pub struct Crypto {
        pub id: Value,
        pub suite: Value,
        pub config: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub session_config: Option<Value>,
    }
}

sdp_record! {
    /// `a=fingerprint:<hash-function> <hash>`
    pub struct Fingerprint {
        #[serde(rename = "type")]
        pub hash_type: Value,
        pub hash: Value,
    }
}

sdp_record! {
    /// `a=candidate:...` (RFC 8839 plus the common browser extensions)
    pub struct Candidate {
        pub foundation: Value,
        pub component: Value,
        pub transport: Value,
        pub priority: Value,
        pub ip: Value,
        pub port: Value,
        #[serde(rename = "type")]
        pub candidate_type: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub raddr: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub rport: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub tcptype: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub generation: Option<Value>,
        #[serde(rename = "network-id", skip_serializing_if = "Option::is_none")]
        pub network_id: Option<Value>,
        #[serde(rename = "network-cost", skip_serializing_if = "Option::is_none")]
        pub network_cost: Option<Value>,
    }
}

sdp_record! {
    /// `a=ssrc:<id> <attribute>[:<value>]`
    pub struct Ssrc {
        pub id: Value,
        pub attribute: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub value: Option<Value>,
    }
}

sdp_record! {
    /// `a=ssrc-group:<semantics> <ssrc ...>`
    pub struct SsrcGroup {
        pub semantics: Value,
        pub ssrcs: Value,
    }
}

sdp_record! {
    /// `a=msid-semantic: <semantic> <token>`
    pub struct MsidSemantic {
        pub semantic: Value,
        pub token: Value,
    }
}

sdp_record! {
    /// `a=group:<type> <mid ...>`
    pub struct Group {
        #[serde(rename = "type")]
        pub group_type: Value,
        pub mids: Value,
    }
}

sdp_record! {
    /// `a=sctpmap:<number> <app>[ <max-message-size>]`
    pub struct Sctpmap {
        pub sctpmap_number: Value,
        pub app: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub max_message_size: Option<Value>,
    }
}

sdp_record! {
    /// `a=rid:<id> <direction>[ <params>]`
    pub struct Rid {
        pub id: Value,
        pub direction: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub params: Option<Value>,
    }
}

sdp_record! {
    /// `a=imageattr:<pt> <dir> <attrs>[ <dir> <attrs>]`
    pub struct ImageAttr {
        pub pt: Value,
        pub dir1: Value,
        pub attrs1: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub dir2: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub attrs2: Option<Value>,
    }
}

sdp_record! {
    /// `a=simulcast:<dir> <list>[ <dir> <list>]`
    pub struct Simulcast {
        pub dir1: Value,
        pub list1: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub dir2: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub list2: Option<Value>,
    }
}

sdp_record! {
    /// `a=simulcast: <value>` as written by draft-ietf-mmusic-sdp-simulcast-03
    pub struct SimulcastDraft03 {
        pub value: Value,
    }
}

sdp_record! {
    /// `a=source-filter: <mode> <nettype> <addrtypes> <dest> <sources>` (RFC 4570)
    pub struct SourceFilter {
        pub filter_mode: Value,
        pub net_type: Value,
        pub address_types: Value,
        pub dest_address: Value,
        pub src_list: Value,
    }
}

sdp_record! {
    /// `a=ts-refclk:<clksrc>[=<ext>]` (RFC 7273)
    pub struct TsRefClock {
        pub clksrc: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub clksrc_ext: Option<Value>,
    }
}

sdp_record! {
    /// `a=mediaclk:[id=<id> ]<name>[=<value>][ rate=<num>/<den>]` (RFC 7273)
    pub struct MediaClock {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub id: Option<Value>,
        pub media_clock_name: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub media_clock_value: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub rate_numerator: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub rate_denominator: Option<Value>,
    }
}

sdp_record! {
    /// `a=floorid:<id> mstrm:<stream>` (RFC 4583)
    pub struct FloorId {
        pub id: Value,
        pub m_stream: Value,
    }
}

sdp_record! {
    /// An attribute line no other rule recognized, kept verbatim
    pub struct Invalid {
        pub value: Value,
    }
}
