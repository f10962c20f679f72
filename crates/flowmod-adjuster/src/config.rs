//! Adjuster configuration.

use of_pipeline::PipelineConfig;
use of_types::ProtocolVersion;
use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_hybrid_mode() -> bool {
    true
}

/// Per-device adjuster configuration.
///
/// ```
/// use flowmod_adjuster::AdjusterConfig;
/// use of_types::ProtocolVersion;
///
/// let config = AdjusterConfig::from_json(r#"{"version": "1.3"}"#).unwrap();
/// assert_eq!(config.version, ProtocolVersion::V1_3);
/// assert!(config.hybrid_mode);
/// assert!(config.pipeline.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjusterConfig {
    /// Negotiated protocol version.
    pub version: ProtocolVersion,
    /// Fall back to normal forwarding for unmatched traffic.
    #[serde(default = "default_hybrid_mode")]
    pub hybrid_mode: bool,
    /// Table pipeline; absent when no table information is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<PipelineConfig>,
}

impl AdjusterConfig {
    /// Creates a configuration in hybrid mode with no pipeline.
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            hybrid_mode: default_hybrid_mode(),
            pipeline: None,
        }
    }

    pub fn with_hybrid_mode(mut self, hybrid_mode: bool) -> Self {
        self.hybrid_mode = hybrid_mode;
        self
    }

    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_yaml_with_pipeline() {
        let yaml = r#"
version: "1.3"
hybrid_mode: false
pipeline:
  tables:
    - table_id: 0
      match_fields: [ETH_TYPE]
      miss_target: 1
    - table_id: 1
"#;
        let config = AdjusterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, ProtocolVersion::V1_3);
        assert!(!config.hybrid_mode);
        assert_eq!(config.pipeline.map(|p| p.tables.len()), Some(2));
    }

    #[test]
    fn test_builder_defaults() {
        let config = AdjusterConfig::new(ProtocolVersion::V1_0);
        assert!(config.hybrid_mode);
        assert!(!config.with_hybrid_mode(false).hybrid_mode);
    }

    #[test]
    fn test_bad_version_rejected() {
        assert!(AdjusterConfig::from_json(r#"{"version": "9.9"}"#).is_err());
    }
}
