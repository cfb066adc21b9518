//! Grammar-driven SDP parser and writer
//!
//! The [`grammar`] table is the single source of truth for both directions:
//! [`parse`] matches each line against it and [`write`] formats records back
//! through the same rules.

#[macro_use]
mod macros;

pub mod format;
pub mod grammar;
pub mod params;
pub mod parser;
pub mod records;
pub mod session;
pub mod value;
pub mod writer;

pub use format::format_line;
pub use grammar::{Grammar, Rule, Target, Template, DEFAULT_INNER_ORDER, DEFAULT_OUTER_ORDER, GRAMMAR};
pub use params::{merge_params, parse_params, without_params, write_config_params, Params};
pub use parser::{
    parse, parse_image_attributes, parse_line, parse_payloads, parse_remote_candidates,
    parse_simulcast_stream_list, RemoteCandidate, SimulcastFormat,
};
pub use records::*;
pub use session::{Fields, MediaSection, SessionDescription, Slot};
pub use value::Value;
pub use writer::{write, write_with, WriteOptions};
