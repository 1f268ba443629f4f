//! Input Parsing Module
//!
//! Turns the two loosely-structured text inputs into timestamped records.
//!
//! # Components
//!
//! - [`decode`]: Lossy byte-to-line decoding at the I/O boundary
//! - [`timestamp`]: Leading timestamp recognition shared by both parsers
//! - [`events`]: Block-aware keyword event extraction from task logs
//! - [`resource`]: Resource metric file discovery and sample parsing

pub mod decode;
pub mod events;
pub mod resource;
pub mod timestamp;

pub use events::{extract_events, BlockState, Event, EventExtractor};
pub use resource::{parse_resource_series, Sample, SeriesTable};
pub use timestamp::{format_timestamp, parse_line_timestamp, Timestamp, TIME_FORMAT};
