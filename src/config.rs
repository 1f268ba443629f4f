//! Correlation Configuration
//!
//! Keyword and file-name heuristics used to pick out pipeline events and
//! resource series. The built-in lists cover NodeODM task output and the
//! file names Remora writes; a JSON file named by
//! `REMORA_CORRELATE_CONFIG` can replace any of them.
//!
//! # Example Override
//!
//! ```json
//! {
//!   "keywords": ["orthophoto", "mesh"],
//!   "mem_series_hints": ["rss"]
//! }
//! ```

use std::fs;
use std::path::Path;

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Deserialize;

/// Environment variable naming an optional JSON override file.
pub const CONFIG_ENV_VAR: &str = "REMORA_CORRELATE_CONFIG";

/// Pipeline-stage terms that mark a task-log line as an event.
const DEFAULT_KEYWORDS: &[&str] = &[
    "stage", "opensfm", "odm", "split", "merge", "orthophoto", "dem", "dsm", "dtm", "mesh",
    "texturing", "depth", "georefer", "entwine", "potree", "pdal", "tiles", "gdal", "cogeo",
    "filter", "reconstruct", "align", "mvs", "smvs", "mve",
];

/// File-name fragments that mark a file as a resource metric.
const DEFAULT_METRIC_FILE_HINTS: &[&str] = &["cpu", "mem", "memory", "io", "disk", "net", "load"];

const DEFAULT_CPU_SERIES_HINTS: &[&str] = &["cpu"];

const DEFAULT_MEM_SERIES_HINTS: &[&str] = &["mem", "memory"];

/// Configuration lists driving event extraction and series selection.
///
/// All hints and keywords are matched as lowercase substrings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Terms that make a task-log line an event
    pub keywords: Vec<String>,

    /// Fragments that make a file a resource-series candidate
    pub metric_file_hints: Vec<String>,

    /// Fragments selecting the series used for the cpu columns
    pub cpu_series_hints: Vec<String>,

    /// Fragments selecting the series used for the mem columns
    pub mem_series_hints: Vec<String>,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            keywords: to_owned_list(DEFAULT_KEYWORDS),
            metric_file_hints: to_owned_list(DEFAULT_METRIC_FILE_HINTS),
            cpu_series_hints: to_owned_list(DEFAULT_CPU_SERIES_HINTS),
            mem_series_hints: to_owned_list(DEFAULT_MEM_SERIES_HINTS),
        }
    }
}

impl CorrelationConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Fields missing from the file keep their built-in values. Any read or
    /// parse problem falls back to the defaults with a warning.
    pub fn load_from_path(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot read config {}: {}. Using defaults.", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => {
                info!("Using config: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Invalid config {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Returns true if the line contains any event keyword.
    pub fn is_event_line(&self, line: &str) -> bool {
        matches_any(&line.to_lowercase(), &self.keywords)
    }

    /// Returns true if the file name suggests a resource metric.
    pub fn is_metric_file(&self, file_name: &str) -> bool {
        matches_any(&file_name.to_lowercase(), &self.metric_file_hints)
    }
}

/// Process-wide configuration, resolved on first use.
pub static ACTIVE_CONFIG: Lazy<CorrelationConfig> = Lazy::new(|| {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => CorrelationConfig::load_from_path(Path::new(&path)),
        None => CorrelationConfig::default(),
    }
});

/// Returns true if `haystack` contains at least one of `needles`.
///
/// No case folding is applied; callers lowercase the haystack.
pub fn matches_any<S: AsRef<str>>(haystack: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_ref()))
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_lists() {
        let config = CorrelationConfig::default();
        assert!(config.keywords.contains(&"orthophoto".to_string()));
        assert!(config.keywords.contains(&"georefer".to_string()));
        assert_eq!(config.metric_file_hints.len(), 7);
        assert_eq!(config.cpu_series_hints, vec!["cpu"]);
        assert_eq!(config.mem_series_hints, vec!["mem", "memory"]);
    }

    #[test]
    fn test_matches_any() {
        assert!(matches_any("running orthophoto stage", &["mesh", "orthophoto"]));
        assert!(!matches_any("nothing here", &["mesh", "orthophoto"]));
        assert!(!matches_any("anything", &[] as &[&str]));
    }

    #[test]
    fn test_is_event_line_case_insensitive() {
        let config = CorrelationConfig::default();
        assert!(config.is_event_line("Georeferencing point cloud"));
        assert!(config.is_event_line("MESH generation"));
        assert!(!config.is_event_line("hello world"));
    }

    #[test]
    fn test_is_metric_file() {
        let config = CorrelationConfig::default();
        assert!(config.is_metric_file("CPU.log"));
        assert!(config.is_metric_file("node1_memory.txt"));
        assert!(config.is_metric_file("loadavg"));
        assert!(!config.is_metric_file("readme.txt"));
    }

    #[test]
    fn test_load_partial_override() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "keywords": ["custom"] }"#).unwrap();

        let config = CorrelationConfig::load_from_path(&path);
        assert_eq!(config.keywords, vec!["custom"]);
        assert_eq!(config.cpu_series_hints, vec!["cpu"]);
    }

    #[test]
    fn test_load_invalid_json_falls_back() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(CorrelationConfig::load_from_path(&path), CorrelationConfig::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = CorrelationConfig::load_from_path(Path::new("/nonexistent/config.json"));
        assert_eq!(config, CorrelationConfig::default());
    }
}
