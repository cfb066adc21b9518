//! The parsed session document
//!
//! A [`SessionDescription`] owns its session-level [`Fields`] and an ordered
//! list of [`MediaSection`]s. Session and media sections share the same
//! field layout because the grammar does not restrict where an attribute
//! may appear; a media section additionally carries its `m=` line.

use serde::{Deserialize, Serialize};

use super::records::{
    Bandwidth, Candidate, Connection, Crypto, Ext, Fingerprint, FloorId, Fmtp, Group, ImageAttr,
    Invalid, MediaClock, MediaLine, MsidSemantic, Origin, Rid, Rtcp, RtcpFb, RtcpFbTrrInt, Rtp,
    Sctpmap, Simulcast, SimulcastDraft03, SourceFilter, Ssrc, SsrcGroup, Timing, TsRefClock,
};
use super::value::Value;

section_fields! {
    singletons {
        /// `v=`
        Version => version: Value = "version",
        /// `o=`
        Origin => origin: Origin = "origin",
        /// `s=`
        Name => name: Value = "name",
        /// `i=`
        Description => description: Value = "description",
        /// `u=`
        Uri => uri: Value = "uri",
        /// `e=`
        Email => email: Value = "email",
        /// `p=`
        Phone => phone: Value = "phone",
        /// `z=`, kept unparsed
        Timezones => timezones: Value = "timezones",
        /// `r=`, kept unparsed
        Repeats => repeats: Value = "repeats",
        /// `t=`
        Timing => timing: Timing = "timing",
        /// `c=`
        Connection => connection: Connection = "connection",
        Control => control: Value = "control",
        Rtcp => rtcp: Rtcp = "rtcp",
        ExtmapAllowMixed => extmap_allow_mixed: Value = "extmapAllowMixed",
        Setup => setup: Value = "setup",
        /// `a=connection:new|existing`
        ConnectionType => connection_type: Value = "connectionType",
        Mid => mid: Value = "mid",
        Msid => msid: Value = "msid",
        Ptime => ptime: Value = "ptime",
        Maxptime => maxptime: Value = "maxptime",
        /// `a=sendrecv`, `a=recvonly`, `a=sendonly` or `a=inactive`
        Direction => direction: Value = "direction",
        IceLite => icelite: Value = "icelite",
        IceUfrag => ice_ufrag: Value = "iceUfrag",
        IcePwd => ice_pwd: Value = "icePwd",
        Fingerprint => fingerprint: Fingerprint = "fingerprint",
        EndOfCandidates => end_of_candidates: Value = "endOfCandidates",
        /// Raw `a=remote-candidates:` value, see [`parse_remote_candidates`](super::parse_remote_candidates)
        RemoteCandidates => remote_candidates: Value = "remoteCandidates",
        IceOptions => ice_options: Value = "iceOptions",
        MsidSemantic => msid_semantic: MsidSemantic = "msidSemantic",
        RtcpMux => rtcp_mux: Value = "rtcpMux",
        RtcpRsize => rtcp_rsize: Value = "rtcpRsize",
        Sctpmap => sctpmap: Sctpmap = "sctpmap",
        XGoogleFlag => x_google_flag: Value = "xGoogleFlag",
        Simulcast => simulcast: Simulcast = "simulcast",
        SimulcastDraft03 => simulcast_03: SimulcastDraft03 = "simulcast_03",
        Framerate => framerate: Value = "framerate",
        SourceFilter => source_filter: SourceFilter = "sourceFilter",
        BundleOnly => bundle_only: Value = "bundleOnly",
        Label => label: Value = "label",
        SctpPort => sctp_port: Value = "sctpPort",
        MaxMessageSize => max_message_size: Value = "maxMessageSize",
        MediaClock => media_clk: MediaClock = "mediaClk",
        Keywords => keywords: Value = "keywords",
        Content => content: Value = "content",
        BfcpFloorCtrl => bfcp_floor_ctrl: Value = "bfcpFloorCtrl",
        BfcpConfId => bfcp_conf_id: Value = "bfcpConfId",
        BfcpUserId => bfcp_user_id: Value = "bfcpUserId",
        BfcpFloorId => bfcp_floor_id: FloorId = "bfcpFloorId",
    }
    codec_lists {
        /// `a=rtpmap:` codec entries
        Rtp => rtp: Rtp = "rtp",
        /// `a=fmtp:` format parameters, associated with `rtp` by payload number
        Fmtp => fmtp: Fmtp = "fmtp",
    }
    lists {
        /// `b=`
        Bandwidth => bandwidth: Bandwidth = "bandwidth",
        RtcpFbTrrInt => rtcp_fb_trr_int: RtcpFbTrrInt = "rtcpFbTrrInt",
        RtcpFb => rtcp_fb: RtcpFb = "rtcpFb",
        Ext => ext: Ext = "ext",
        Crypto => crypto: Crypto = "crypto",
        Candidates => candidates: Candidate = "candidates",
        Ssrcs => ssrcs: Ssrc = "ssrcs",
        SsrcGroups => ssrc_groups: SsrcGroup = "ssrcGroups",
        Groups => groups: Group = "groups",
        Rids => rids: Rid = "rids",
        ImageAttrs => imageattrs: ImageAttr = "imageattrs",
        TsRefClocks => ts_ref_clocks: TsRefClock = "tsRefClocks",
        /// Attribute lines no other rule recognized, verbatim
        Invalid => invalid: Invalid = "invalid",
    }
}

/// One `m=` block and everything recorded after it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSection {
    #[serde(flatten)]
    pub line: MediaLine,
    #[serde(flatten)]
    pub fields: Fields,
}

impl MediaSection {
    /// The media type (`audio`, `video`, `application`, ...)
    pub fn media_type(&self) -> &Value {
        &self.line.media_type
    }

    /// Payload numbers of the section's codec entries, in codec-list order
    pub fn codec_payloads(&self) -> Vec<Value> {
        self.fields.rtp.iter().map(|rtp| rtp.payload.clone()).collect()
    }
}

/// A complete parsed session description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(default)]
    pub media: Vec<MediaSection>,
}

impl SessionDescription {
    /// Render the document as JSON, with the same keys a JavaScript
    /// consumer of the session description would expect.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document from its JSON rendering
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Media sections of the given type, in document order
    pub fn media_of_type<'a>(&'a self, media_type: &'a str) -> impl Iterator<Item = &'a MediaSection> + 'a {
        self.media.iter().filter(move |m| m.line.media_type == media_type)
    }
}
