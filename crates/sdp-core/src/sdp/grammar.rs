//! The SDP grammar table
//!
//! Every line type (`v`, `o`, `a`, ...) maps to an ordered list of [`Rule`]s.
//! The parser tries the rules of a line's type in declaration order and the
//! first one whose pattern matches wins, so more specific patterns come
//! first and the `a=` catch-all that feeds the `invalid` bucket comes last.
//!
//! The writer walks the same table: for each line type, in rule order, it
//! emits every record stored in the rule's slot. Rule order within a line
//! type is therefore also the order attribute lines appear in the output.
//!
//! Patterns are compiled once on first use and shared read-only.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use super::format::format_line;
use super::session::Slot;
use super::value::Value;

/// Session-level emission order (RFC 8866 §5)
pub const DEFAULT_OUTER_ORDER: &[char] = &['v', 'o', 's', 'i', 'u', 'e', 'p', 'c', 'b', 't', 'r', 'z', 'a'];

/// Media-level emission order, after the `m=` line itself
pub const DEFAULT_INNER_ORDER: &[char] = &['i', 'c', 'b', 'a'];

/// Where a rule stores its captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// One record per section, replaced by later lines of the same kind
    Singleton(Slot),
    /// Appended to an ordered list on the section
    Repeated(Slot),
    /// The `m=` line of the current media section
    MediaLine,
}

/// Captured fields of one record, addressable by field name.
///
/// Handed to template selectors so that they can test for optional fields
/// by name.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    names: &'static [&'static str],
    values: &'a [Option<Value>],
}

impl<'a> Args<'a> {
    pub fn new(names: &'static [&'static str], values: &'a [Option<Value>]) -> Self {
        Self { names, values }
    }

    /// The value of the named field, if captured
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let idx = self.names.iter().position(|n| *n == name)?;
        self.values.get(idx).and_then(Option::as_ref)
    }

    /// True when the named field was captured
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Picks a template for a record whose shape depends on optional fields
pub type Selector = fn(&Args<'_>) -> String;

/// How a rule serializes its record
#[derive(Clone, Copy)]
pub enum Template {
    /// The same template for every record
    Fixed(&'static str),
    /// Chosen per record
    Select(Selector),
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Fixed(t) => f.debug_tuple("Fixed").field(t).finish(),
            Template::Select(_) => f.write_str("Select(..)"),
        }
    }
}

/// One way of recognizing and serializing a line
#[derive(Debug)]
pub struct Rule {
    pub target: Target,
    pub pattern: Regex,
    /// Capture-group names in order; empty for single-value rules
    pub names: &'static [&'static str],
    pub template: Template,
}

impl Rule {
    fn new(target: Target, pattern: &str, names: &'static [&'static str], template: Template) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid grammar pattern {:?}: {}", pattern, e));
        Self { target, pattern, names, template }
    }

    /// The key the rule stores under
    pub fn name(&self) -> &'static str {
        match self.target {
            Target::Singleton(slot) | Target::Repeated(slot) => slot.key(),
            Target::MediaLine => "media",
        }
    }

    /// True if the pattern matches the line content
    pub fn matches(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    /// Match the content and return the captured fields in declared order.
    ///
    /// Single-value rules yield exactly one field (the first group).
    pub fn captures(&self, content: &str) -> Option<Vec<Option<Value>>> {
        let caps = self.pattern.captures(content)?;
        let count = self.names.len().max(1);
        Some(
            (1..=count)
                .map(|i| caps.get(i).map(|m| Value::coerce(m.as_str())))
                .collect(),
        )
    }

    /// Serialize one record as a full `<type>=<content>` line
    pub fn format(&self, line_type: char, args: &[Option<Value>]) -> String {
        let body = match self.template {
            Template::Fixed(template) => format_line(template, args),
            Template::Select(select) => format_line(&select(&Args::new(self.names, args)), args),
        };
        format!("{}={}", line_type, body)
    }
}

/// The read-only rule registry
#[derive(Debug)]
pub struct Grammar {
    rules: HashMap<char, Vec<Rule>>,
}

impl Grammar {
    /// Rules for a line type, in priority order. Unknown types have none.
    pub fn rules(&self, line_type: char) -> &[Rule] {
        self.rules.get(&line_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The rule for the `m=` line
    pub fn media_rule(&self) -> &Rule {
        &self.rules(MEDIA_LINE_TYPE)[0]
    }

    /// Line types known to the grammar
    pub fn line_types(&self) -> impl Iterator<Item = char> + '_ {
        self.rules.keys().copied()
    }
}

pub(crate) const MEDIA_LINE_TYPE: char = 'm';

/// The shared grammar table
pub static GRAMMAR: Lazy<Grammar> = Lazy::new(build);

fn singleton(slot: Slot, pattern: &str, names: &'static [&'static str], template: Template) -> Rule {
    Rule::new(Target::Singleton(slot), pattern, names, template)
}

fn repeated(slot: Slot, pattern: &str, names: &'static [&'static str], template: Template) -> Rule {
    Rule::new(Target::Repeated(slot), pattern, names, template)
}

/// A single-value line whose whole content is the value
fn text(slot: Slot) -> Rule {
    singleton(slot, r"(.*)", &[], Template::Fixed("%s"))
}

fn build() -> Grammar {
    use Template::Fixed;

    let mut rules = HashMap::new();

    rules.insert('v', vec![singleton(Slot::Version, r"^(\d*)$", &[], Fixed("%s"))]);
    rules.insert(
        'o',
        vec![singleton(
            Slot::Origin,
            r"^(\S*) (\d*) (\d*) (\S*) IP(\d) (\S*)",
            &["username", "sessionId", "sessionVersion", "netType", "ipVer", "address"],
            Fixed("%s %s %d %s IP%d %s"),
        )],
    );
    rules.insert('s', vec![text(Slot::Name)]);
    rules.insert('i', vec![text(Slot::Description)]);
    rules.insert('u', vec![text(Slot::Uri)]);
    rules.insert('e', vec![text(Slot::Email)]);
    rules.insert('p', vec![text(Slot::Phone)]);
    rules.insert('z', vec![text(Slot::Timezones)]);
    rules.insert('r', vec![text(Slot::Repeats)]);
    rules.insert(
        't',
        vec![singleton(Slot::Timing, r"^(\d*) (\d*)", &["start", "stop"], Fixed("%d %d"))],
    );
    rules.insert(
        'c',
        vec![singleton(Slot::Connection, r"^IN IP(\d) (\S*)", &["version", "ip"], Fixed("IN IP%d %s"))],
    );
    rules.insert(
        'b',
        vec![repeated(
            Slot::Bandwidth,
            r"^(TIAS|AS|CT|RR|RS):(\d*)",
            &["type", "limit"],
            Fixed("%s:%s"),
        )],
    );
    rules.insert(
        MEDIA_LINE_TYPE,
        vec![Rule::new(
            Target::MediaLine,
            r"^(\w*) (\d*) ([\w/]*)(?: (.*))?",
            &["type", "port", "protocol", "payloads"],
            Fixed("%s %d %s %s"),
        )],
    );
    rules.insert('a', attribute_rules());

    Grammar { rules }
}

fn attribute_rules() -> Vec<Rule> {
    use Template::{Fixed, Select};

    vec![
        // a=rtpmap:110 opus/48000/2
        repeated(
            Slot::Rtp,
            r"^rtpmap:(\d*) ([\w\-.]*)(?:\s*/(\d*)(?:\s*/(\S*))?)?",
            &["payload", "codec", "rate", "encoding"],
            Select(|o| {
                if o.has("encoding") {
                    "rtpmap:%d %s/%s/%s".into()
                } else if o.has("rate") {
                    "rtpmap:%d %s/%s".into()
                } else {
                    "rtpmap:%d %s".into()
                }
            }),
        ),
        // a=fmtp:111 minptime=10; useinbandfec=1
        repeated(Slot::Fmtp, r"^fmtp:(\d*) ([\S| ]*)", &["payload", "config"], Fixed("fmtp:%d %s")),
        // a=control:streamid=0
        singleton(Slot::Control, r"^control:(.*)", &[], Fixed("control:%s")),
        // a=rtcp:65179 IN IP4 193.84.77.194
        singleton(
            Slot::Rtcp,
            r"^rtcp:(\d*)(?: (\S*) IP(\d) (\S*))?",
            &["port", "netType", "ipVer", "address"],
            Select(|o| {
                if o.has("address") {
                    "rtcp:%d %s IP%d %s".into()
                } else {
                    "rtcp:%d".into()
                }
            }),
        ),
        // a=rtcp-fb:98 trr-int 100
        repeated(
            Slot::RtcpFbTrrInt,
            r"^rtcp-fb:(\*|\d*) trr-int (\d*)",
            &["payload", "value"],
            Fixed("rtcp-fb:%s trr-int %d"),
        ),
        // a=rtcp-fb:98 nack rpsi
        repeated(
            Slot::RtcpFb,
            r"^rtcp-fb:(\*|\d*) ([\w_-]*)(?: ([\w_-]*))?",
            &["payload", "type", "subtype"],
            Select(|o| {
                if o.has("subtype") {
                    "rtcp-fb:%s %s %s".into()
                } else {
                    "rtcp-fb:%s %s".into()
                }
            }),
        ),
        // a=extmap:2 urn:ietf:params:rtp-hdrext:toffset
        // a=extmap:1/recvonly URI-gps-string
        // a=extmap:3 urn:ietf:params:rtp-hdrext:encrypt urn:ietf:params:rtp-hdrext:smpte-tc 25@600/24
        repeated(
            Slot::Ext,
            r"^extmap:(\d+)(?:/(\w+))?(?: (urn:ietf:params:rtp-hdrext:encrypt))? (\S*)(?: (\S*))?",
            &["value", "direction", "encrypt-uri", "uri", "config"],
            Select(|o| {
                let mut t = String::from("extmap:%d");
                t.push_str(if o.has("direction") { "/%s" } else { "%v" });
                t.push_str(if o.has("encrypt-uri") { " %s" } else { "%v" });
                t.push_str(" %s");
                if o.has("config") {
                    t.push_str(" %s");
                }
                t
            }),
        ),
        singleton(Slot::ExtmapAllowMixed, r"^(extmap-allow-mixed)", &[], Fixed("%s")),
        // a=crypto:1 AES_CM_128_HMAC_SHA1_80 inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^20|1:32
        repeated(
            Slot::Crypto,
            r"^crypto:(\d*) ([\w_]*) (\S*)(?: (\S*))?",
            &["id", "suite", "config", "sessionConfig"],
            Select(|o| {
                if o.has("sessionConfig") {
                    "crypto:%d %s %s %s".into()
                } else {
                    "crypto:%d %s %s".into()
                }
            }),
        ),
        singleton(Slot::Setup, r"^setup:(\w*)", &[], Fixed("setup:%s")),
        singleton(Slot::ConnectionType, r"^connection:(new|existing)", &[], Fixed("connection:%s")),
        singleton(Slot::Mid, r"^mid:([^\s]*)", &[], Fixed("mid:%s")),
        singleton(Slot::Msid, r"^msid:(.*)", &[], Fixed("msid:%s")),
        singleton(Slot::Ptime, r"^ptime:(\d*)", &[], Fixed("ptime:%d")),
        singleton(Slot::Maxptime, r"^maxptime:(\d*)", &[], Fixed("maxptime:%d")),
        singleton(Slot::Direction, r"^(sendrecv|recvonly|sendonly|inactive)", &[], Fixed("%s")),
        singleton(Slot::IceLite, r"^(ice-lite)", &[], Fixed("%s")),
        singleton(Slot::IceUfrag, r"^ice-ufrag:(\S*)", &[], Fixed("ice-ufrag:%s")),
        singleton(Slot::IcePwd, r"^ice-pwd:(\S*)", &[], Fixed("ice-pwd:%s")),
        singleton(
            Slot::Fingerprint,
            r"^fingerprint:(\S*) (\S*)",
            &["type", "hash"],
            Fixed("fingerprint:%s %s"),
        ),
        // a=candidate:3289912957 2 udp 1845501695 193.84.77.194 60017 typ srflx raddr 192.168.34.75 rport 60017 generation 0 network-id 3 network-cost 10
        repeated(
            Slot::Candidates,
            r"^candidate:(\S*) (\d*) (\S*) (\d*) (\S*) (\d*) typ (\S*)(?: raddr (\S*) rport (\d*))?(?: tcptype (\S*))?(?: generation (\d*))?(?: network-id (\d*))?(?: network-cost (\d*))?",
            &[
                "foundation",
                "component",
                "transport",
                "priority",
                "ip",
                "port",
                "type",
                "raddr",
                "rport",
                "tcptype",
                "generation",
                "network-id",
                "network-cost",
            ],
            Select(|o| {
                let mut t = String::from("candidate:%s %d %s %d %s %d typ %s");
                t.push_str(if o.has("raddr") { " raddr %s rport %d" } else { "%v%v" });
                t.push_str(if o.has("tcptype") { " tcptype %s" } else { "%v" });
                t.push_str(if o.has("generation") { " generation %d" } else { "%v" });
                t.push_str(if o.has("network-id") { " network-id %d" } else { "%v" });
                t.push_str(if o.has("network-cost") { " network-cost %d" } else { "%v" });
                t
            }),
        ),
        singleton(Slot::EndOfCandidates, r"^(end-of-candidates)", &[], Fixed("%s")),
        singleton(Slot::RemoteCandidates, r"^remote-candidates:(.*)", &[], Fixed("remote-candidates:%s")),
        singleton(Slot::IceOptions, r"^ice-options:(\S*)", &[], Fixed("ice-options:%s")),
        // a=ssrc:2566107569 cname:t9YU8M1UxTF8Y1A1
        repeated(
            Slot::Ssrcs,
            r"^ssrc:(\d*) ([\w_-]*)(?::(.*))?",
            &["id", "attribute", "value"],
            Select(|o| {
                let mut t = String::from("ssrc:%d");
                if o.has("attribute") {
                    t.push_str(" %s");
                    if o.has("value") {
                        t.push_str(":%s");
                    }
                }
                t
            }),
        ),
        // token-char = %x21 / %x23-27 / %x2A-2B / %x2D-2E / %x30-39 / %x41-5A / %x5E-7E
        repeated(
            Slot::SsrcGroups,
            r"^ssrc-group:([\x21\x23\x24\x25\x26\x27\x2A\x2B\x2D\x2E\w]*) (.*)",
            &["semantics", "ssrcs"],
            Fixed("ssrc-group:%s %s"),
        ),
        // The space after ':' is what browsers emit
        singleton(
            Slot::MsidSemantic,
            r"^msid-semantic:\s?(\w*) (\S*)",
            &["semantic", "token"],
            Fixed("msid-semantic: %s %s"),
        ),
        repeated(Slot::Groups, r"^group:(\w*) (.*)", &["type", "mids"], Fixed("group:%s %s")),
        singleton(Slot::RtcpMux, r"^(rtcp-mux)", &[], Fixed("%s")),
        singleton(Slot::RtcpRsize, r"^(rtcp-rsize)", &[], Fixed("%s")),
        // a=sctpmap:5000 webrtc-datachannel 1024
        singleton(
            Slot::Sctpmap,
            r"^sctpmap:([\w_/]*) (\S*)(?: (\S*))?",
            &["sctpmapNumber", "app", "maxMessageSize"],
            Select(|o| {
                if o.has("maxMessageSize") {
                    "sctpmap:%s %s %s".into()
                } else {
                    "sctpmap:%s %s".into()
                }
            }),
        ),
        singleton(Slot::XGoogleFlag, r"^x-google-flag:([^\s]*)", &[], Fixed("x-google-flag:%s")),
        // a=rid:1 send max-width=1280;max-height=720;max-fps=30;depend=0
        repeated(
            Slot::Rids,
            r"^rid:([\d\w]+) (\w+)(?: ([\S| ]*))?",
            &["id", "direction", "params"],
            Select(|o| {
                if o.has("params") {
                    "rid:%s %s %s".into()
                } else {
                    "rid:%s %s".into()
                }
            }),
        ),
        // a=imageattr:97 send [x=800,y=640,sar=1.1,q=0.6] [x=480,y=320] recv [x=330,y=250]
        // a=imageattr:* send [x=800,y=640] recv *
        repeated(
            Slot::ImageAttrs,
            concat!(
                r"^imageattr:(\d+|\*)",
                r"[\s\t]+(send|recv)[\s\t]+(\*|\[\S+\](?:[\s\t]+\[\S+\])*)",
                r"(?:[\s\t]+(recv|send)[\s\t]+(\*|\[\S+\](?:[\s\t]+\[\S+\])*))?",
            ),
            &["pt", "dir1", "attrs1", "dir2", "attrs2"],
            Select(|o| {
                let mut t = String::from("imageattr:%s %s %s");
                if o.has("dir2") {
                    t.push_str(" %s %s");
                }
                t
            }),
        ),
        // a=simulcast:send 1,2,3;~4,~5 recv 6;~7,~8
        singleton(
            Slot::Simulcast,
            concat!(
                r"^simulcast:",
                r"(send|recv) ([a-zA-Z0-9\-_~;,]+)",
                r"(?:\s?(send|recv) ([a-zA-Z0-9\-_~;,]+))?",
                r"$",
            ),
            &["dir1", "list1", "dir2", "list2"],
            Select(|o| {
                let mut t = String::from("simulcast:%s %s");
                if o.has("dir2") {
                    t.push_str(" %s %s");
                }
                t
            }),
        ),
        // a=simulcast: recv pt=97;98 send pt=97
        singleton(
            Slot::SimulcastDraft03,
            r"^simulcast:[\s\t]+([\S+\s\t]+)$",
            &["value"],
            Fixed("simulcast: %s"),
        ),
        // a=framerate:29.97
        singleton(Slot::Framerate, r"^framerate:(\d+(?:$|\.\d+))", &[], Fixed("framerate:%s")),
        // a=source-filter: incl IN IP4 239.5.2.31 10.1.15.5
        singleton(
            Slot::SourceFilter,
            r"^source-filter: *(excl|incl) (\S*) (IP4|IP6|\*) (\S*) (.*)",
            &["filterMode", "netType", "addressTypes", "destAddress", "srcList"],
            Fixed("source-filter: %s %s %s %s %s"),
        ),
        singleton(Slot::BundleOnly, r"^(bundle-only)", &[], Fixed("%s")),
        singleton(Slot::Label, r"^label:(.+)", &[], Fixed("label:%s")),
        singleton(Slot::SctpPort, r"^sctp-port:(\d+)$", &[], Fixed("sctp-port:%s")),
        singleton(Slot::MaxMessageSize, r"^max-message-size:(\d+)$", &[], Fixed("max-message-size:%s")),
        // a=ts-refclk:ptp=IEEE1588-2008:39-A7-94-FF-FE-07-CB-D0:37
        repeated(
            Slot::TsRefClocks,
            r"^ts-refclk:([^\s=]*)(?:=(\S*))?",
            &["clksrc", "clksrcExt"],
            Select(|o| {
                if o.has("clksrcExt") {
                    "ts-refclk:%s=%s".into()
                } else {
                    "ts-refclk:%s".into()
                }
            }),
        ),
        // a=mediaclk:direct=963214424
        singleton(
            Slot::MediaClock,
            r"^mediaclk:(?:id=(\S*))? *([^\s=]*)(?:=(\S*))?(?: *rate=(\d+)/(\d+))?",
            &["id", "mediaClockName", "mediaClockValue", "rateNumerator", "rateDenominator"],
            Select(|o| {
                let mut t = String::from("mediaclk:");
                t.push_str(if o.has("id") { "id=%s %s" } else { "%v%s" });
                t.push_str(if o.has("mediaClockValue") { "=%s" } else { "%v" });
                t.push_str(if o.has("rateNumerator") { " rate=%s" } else { "%v" });
                if o.has("rateDenominator") {
                    t.push_str("/%s");
                }
                t
            }),
        ),
        singleton(Slot::Keywords, r"^keywds:(.+)$", &[], Fixed("keywds:%s")),
        singleton(Slot::Content, r"^content:(.+)", &[], Fixed("content:%s")),
        // BFCP (RFC 4583)
        singleton(Slot::BfcpFloorCtrl, r"^floorctrl:(c-only|s-only|c-s)", &[], Fixed("floorctrl:%s")),
        singleton(Slot::BfcpConfId, r"^confid:(\d+)", &[], Fixed("confid:%s")),
        singleton(Slot::BfcpUserId, r"^userid:(\d+)", &[], Fixed("userid:%s")),
        singleton(
            Slot::BfcpFloorId,
            r"^floorid:(.+) (?:m-stream|mstrm):(.+)",
            &["id", "mStream"],
            Fixed("floorid:%s mstrm:%s"),
        ),
        // Anything not recognized above; must stay last
        repeated(Slot::Invalid, r"(.*)", &["value"], Fixed("%s")),
    ]
}
