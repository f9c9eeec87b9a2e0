//! Parser for log lines emitted by the Atlas transaction platform.
//!
//! Each line carries a year-less syslog timestamp, a hostname, a component
//! label and one of several payload formats:
//!
//! | prefix      | body                                               |
//! |-------------|----------------------------------------------------|
//! | `response,` | header, client quad, `|`-separated fragments       |
//! | `request,`  | same as `response,`                                |
//! | `error,`    | header, fragments merged into one map              |
//! | `opuse,`    | header, `\t`, 23-field backslash block             |
//! | `hostload,` | 6 comma fields                                     |
//!
//! Anything else, or any payload that fails its sub-parser, becomes an
//! unparsed [`Record`] carrying the original text.

mod decode;
mod error;
pub mod input;
mod parse;
pub mod processor;
pub mod record;
pub mod value;

pub use decode::unwrap;
pub use error::Error;
pub use parse::{
    LineHeader, TIMESTAMP_WIDTH, parse_line, parse_line_in_year, parse_timestamp, split_header,
};
pub use processor::{ProcessSummary, Processor, ProcessorConfig};
pub use record::{ClientHeader, Command, ErrorRecord, HostLoad, OpUse, Record, ReqResp};
pub use value::{Map, Value};
