//! Event to Sample Alignment
//!
//! Nearest-timestamp lookup of resource samples for each event.

use log::{debug, warn};

use crate::config::{matches_any, CorrelationConfig};
use crate::parsing::{Event, Sample, SeriesTable, Timestamp};

/// An event paired with its nearest cpu and mem samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedEvent<'a> {
    pub event: &'a Event,
    pub cpu: Option<&'a Sample>,
    pub mem: Option<&'a Sample>,
}

/// Returns the sample whose timestamp is closest to `t`.
///
/// `samples` must be sorted by timestamp; unsorted input gives a wrong
/// but non-panicking answer. Queries before the first or after the last
/// sample clamp to that end. An exact tie picks the earlier sample.
/// Returns `None` only for an empty slice.
pub fn nearest_sample(samples: &[Sample], t: Timestamp) -> Option<&Sample> {
    let idx = samples.partition_point(|s| s.timestamp < t);

    if idx == 0 {
        return samples.first();
    }
    if idx >= samples.len() {
        return samples.last();
    }

    let before = &samples[idx - 1];
    let after = &samples[idx];
    if t - before.timestamp <= after.timestamp - t {
        Some(before)
    } else {
        Some(after)
    }
}

/// Picks the first series whose key contains any of `hints`.
pub fn select_series<'a, S: AsRef<str>>(
    table: &'a SeriesTable,
    hints: &[S],
) -> Option<(&'a str, &'a [Sample])> {
    table.iter().find(|(key, _)| matches_any(key, hints))
}

/// Aligns every event against the configured cpu and mem series.
///
/// Output preserves event order. A missing series leaves that side `None`
/// for all events.
pub fn align_events<'a>(
    events: &'a [Event],
    table: &'a SeriesTable,
    config: &CorrelationConfig,
) -> Vec<AlignedEvent<'a>> {
    let cpu = select_series(table, &config.cpu_series_hints);
    let mem = select_series(table, &config.mem_series_hints);

    match cpu {
        Some((key, _)) => debug!("Using '{}' for cpu samples", key),
        None => warn!("No cpu series found; cpu columns will be empty"),
    }
    match mem {
        Some((key, _)) => debug!("Using '{}' for mem samples", key),
        None => warn!("No mem series found; mem columns will be empty"),
    }

    let cpu_samples = cpu.map(|(_, samples)| samples).unwrap_or_default();
    let mem_samples = mem.map(|(_, samples)| samples).unwrap_or_default();

    events
        .iter()
        .map(|event| AlignedEvent {
            event,
            cpu: nearest_sample(cpu_samples, event.timestamp),
            mem: nearest_sample(mem_samples, event.timestamp),
        })
        .collect()
}
