//! SDP text writer
//!
//! The writer walks the grammar table in section order and formats every
//! record the document holds, so any document produced by [`parse`](super::parse)
//! writes back to text that parses to the same document.

use super::grammar::{Rule, Target, DEFAULT_INNER_ORDER, DEFAULT_OUTER_ORDER, GRAMMAR, MEDIA_LINE_TYPE};
use super::records::Record;
use super::session::{Fields, SessionDescription, Slot};
use super::value::Value;

/// Line-type ordering used by [`write_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Line types emitted at session level, in order
    pub outer_order: Vec<char>,
    /// Line types emitted per media section after its `m=` line, in order
    pub inner_order: Vec<char>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            outer_order: DEFAULT_OUTER_ORDER.to_vec(),
            inner_order: DEFAULT_INNER_ORDER.to_vec(),
        }
    }
}

/// Write a session description in canonical line order.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::sdp::{parse, write};
///
/// let text = "v=0\r\ns=-\r\nm=audio 9 RTP/AVP 0\r\na=rtpmap:0 PCMU/8000\r\n";
/// assert_eq!(write(&parse(text)), text);
/// ```
pub fn write(session: &SessionDescription) -> String {
    write_with(session, &WriteOptions::default())
}

/// Write a session description with custom line ordering.
///
/// A missing version is written as `v=0` and a missing session name as
/// `s= `; a media section without a payload list gets an empty one.
/// Lines are joined with CRLF and the output ends with CRLF.
pub fn write_with(session: &SessionDescription, options: &WriteOptions) -> String {
    let mut lines = Vec::new();

    for &line_type in &options.outer_order {
        for rule in GRAMMAR.rules(line_type) {
            for args in session_args(&session.fields, rule) {
                lines.push(rule.format(line_type, &args));
            }
        }
    }

    for section in &session.media {
        let mut line = section.line.clone();
        line.payloads.get_or_insert_with(|| Value::from(""));
        lines.push(GRAMMAR.media_rule().format(MEDIA_LINE_TYPE, &line.to_args()));

        for &line_type in &options.inner_order {
            for rule in GRAMMAR.rules(line_type) {
                for args in section_args(&section.fields, rule) {
                    lines.push(rule.format(line_type, &args));
                }
            }
        }
    }

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn section_args(fields: &Fields, rule: &Rule) -> Vec<Vec<Option<Value>>> {
    match rule.target {
        Target::Singleton(slot) | Target::Repeated(slot) => fields.emit(slot),
        Target::MediaLine => Vec::new(),
    }
}

fn session_args(fields: &Fields, rule: &Rule) -> Vec<Vec<Option<Value>>> {
    match rule.target {
        Target::Singleton(Slot::Version) if fields.version.is_none() => {
            vec![vec![Some(Value::Int(0))]]
        }
        Target::Singleton(Slot::Name) if fields.name.is_none() => {
            vec![vec![Some(Value::from(" "))]]
        }
        _ => section_args(fields, rule),
    }
}
