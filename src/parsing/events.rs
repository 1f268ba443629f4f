//! Task Log Event Extraction
//!
//! Scans NodeODM-style task output, where each task's output is framed by
//! a header and an end marker:
//!
//! ```text
//! ===== ODM Task Output (3f2a...) @ 2024-01-01 12:00:00
//! [INFO]    Running orthophoto stage
//! ===== End Task Output =====
//! ```
//!
//! Lines inside a block that contain a pipeline keyword become events
//! stamped with the block's header time.

use std::path::Path;

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use super::decode::read_lines_lossy;
use super::timestamp::{parse_datetime, Timestamp};
use crate::config::CorrelationConfig;
use crate::error::Result;

static BLOCK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^===== (?P<label>.+?) \((?P<uuid>[^)]+)\) @ (?P<ts>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})",
    )
    .expect("valid block header regex")
});

static BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^===== End Task Output =====").expect("valid block end regex"));

/// A keyword-matching log line tagged with its block's start time.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Start time of the enclosing block
    pub timestamp: Timestamp,
    /// Trimmed line text
    pub text: String,
}

/// Parsed start-of-block marker.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeader {
    /// Text between the marker and the task id, e.g. `ODM Task Output`
    pub label: String,
    /// Task id inside the parentheses
    pub uuid: String,
    /// `None` when the header's date-time is not a real calendar time
    pub timestamp: Option<Timestamp>,
}

impl BlockHeader {
    /// Parses a header line, if it is one.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = BLOCK_HEADER.captures(line)?;
        Some(Self {
            label: caps["label"].to_string(),
            uuid: caps["uuid"].to_string(),
            timestamp: parse_datetime(&caps["ts"]),
        })
    }
}

/// Returns true if the line closes a block.
pub fn is_block_end(line: &str) -> bool {
    BLOCK_END.is_match(line)
}

/// Block scanning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    /// Not inside any block
    #[default]
    Outside,
    /// Inside a block. A header whose time failed to parse leaves the block
    /// open but inert: no line can become an event until the next marker.
    InsideBlock(Option<Timestamp>),
}

/// Line-at-a-time state machine over a task log.
#[derive(Debug)]
pub struct EventExtractor<'a> {
    config: &'a CorrelationConfig,
    state: BlockState,
}

impl<'a> EventExtractor<'a> {
    /// Creates an extractor positioned outside any block.
    pub fn new(config: &'a CorrelationConfig) -> Self {
        Self {
            config,
            state: BlockState::Outside,
        }
    }

    /// Returns the current block state.
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Consumes one line, returning an event if the line produces one.
    pub fn feed(&mut self, line: &str) -> Option<Event> {
        if let Some(header) = BlockHeader::parse(line) {
            if header.timestamp.is_none() {
                debug!("Block {} has an unparsable timestamp; ignoring its lines", header.uuid);
            } else {
                debug!("Entering block '{}' ({})", header.label, header.uuid);
            }
            self.state = BlockState::InsideBlock(header.timestamp);
            return None;
        }

        match self.state {
            BlockState::Outside => None,
            BlockState::InsideBlock(_) if is_block_end(line) => {
                self.state = BlockState::Outside;
                None
            }
            BlockState::InsideBlock(None) => None,
            BlockState::InsideBlock(Some(timestamp)) => {
                if self.config.is_event_line(line) {
                    Some(Event {
                        timestamp,
                        text: line.trim().to_string(),
                    })
                } else {
                    None
                }
            }
        }
    }
}

/// Extracts events from already-decoded lines.
pub fn extract_events_from_lines<I, S>(lines: I, config: &CorrelationConfig) -> Vec<Event>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = EventExtractor::new(config);
    lines
        .into_iter()
        .filter_map(|line| extractor.feed(line.as_ref()))
        .collect()
}

/// Extracts events from a task log file.
///
/// A path that is not an existing file yields no events.
pub fn extract_events(log_path: &Path, config: &CorrelationConfig) -> Result<Vec<Event>> {
    if !log_path.is_file() {
        info!("Task log not found: {}", log_path.display());
        return Ok(Vec::new());
    }

    let lines = read_lines_lossy(log_path)?;
    let events = extract_events_from_lines(&lines, config);

    info!(
        "Extracted {} events from {} ({} lines)",
        events.len(),
        log_path.display(),
        lines.len()
    );
    Ok(events)
}
