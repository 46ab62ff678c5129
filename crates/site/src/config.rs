use crate::error::ConfigError;
use crate::search::SearchOptions;
use inkpost_core::{ReadingTimeOptions, RenderOptions};
use serde::{Deserialize, Serialize};

/// Settings for every stage of the pipeline.
///
/// All sections are optional; omitted keys keep their defaults:
///
/// ```yaml
/// reading:
///   wordsPerMinute: 200
/// render:
///   escapeCode: true
/// search:
///   threshold: 0.4
///   minQueryLen: 3
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Reading time estimation.
    pub reading: ReadingTimeOptions,
    /// Markdown rendering.
    pub render: RenderOptions,
    /// Search index construction and querying.
    pub search: SearchOptions,
}

impl PipelineConfig {
    /// Parses a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    /// Parses a JSON object.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }
}
