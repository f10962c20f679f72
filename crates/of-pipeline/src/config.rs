//! Serializable pipeline configuration.
//!
//! A pipeline file lists tables in pipeline order:
//!
//! ```yaml
//! tables:
//!   - table_id: 0
//!     match_fields: [IN_PORT, ETH_TYPE, VLAN_VID]
//!     instructions: [APPLY_ACTIONS, GOTO_TABLE]
//!     instructions_miss: [GOTO_TABLE]
//!     apply_actions: [OUTPUT]
//!     miss_target: 100
//!   - table_id: 100
//!     match_fields: [IN_PORT, ETH_TYPE, VLAN_VID, VLAN_PCP, IPV4_DST]
//!     instructions: [APPLY_ACTIONS]
//!     apply_actions: [OUTPUT]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::context::PipelineDefinition;
use crate::error::{PipelineError, Result};
use crate::features::TableFeatures;
use crate::pipeline::Pipeline;

/// Table list as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub tables: Vec<TableFeatures>,
}

impl PipelineConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Reads a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let content = std::fs::read_to_string(path)?;
        match ext.as_str() {
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => Err(PipelineError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Validates the wiring and builds a [`Pipeline`].
    pub fn to_pipeline(&self) -> Result<Pipeline> {
        Pipeline::builder()
            .with_tables(self.tables.iter().cloned())
            .build()
    }
}

impl TryFrom<PipelineConfig> for Pipeline {
    type Error = PipelineError;

    fn try_from(config: PipelineConfig) -> Result<Self> {
        Pipeline::builder().with_tables(config.tables).build()
    }
}

impl From<&Pipeline> for PipelineConfig {
    fn from(pipeline: &Pipeline) -> Self {
        Self {
            tables: pipeline
                .table_ids()
                .into_iter()
                .filter_map(|tid| pipeline.table(tid).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityClass;
    use crate::context::TableContext;
    use of_flow::{ActionType, FieldType, InstructionType};
    use of_types::TableId;
    use pretty_assertions::assert_eq;

    const YAML: &str = r#"
tables:
  - table_id: 0
    name: vlan
    match_fields: [ETH_TYPE, VLAN_VID]
    instructions: [APPLY_ACTIONS, GOTO_TABLE]
    instructions_miss: [GOTO_TABLE]
    apply_actions: [OUTPUT]
    miss_target: 100
  - table_id: 100
    match_fields: [ETH_TYPE, VLAN_VID, VLAN_PCP, IPV4_DST]
    instructions: [APPLY_ACTIONS]
    apply_actions: [OUTPUT, SET_FIELD]
    apply_setfield: [VLAN_PCP]
"#;

    #[test]
    fn test_from_yaml() {
        let config = PipelineConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.tables.len(), 2);

        let pipeline = config.to_pipeline().unwrap();
        let t100 = TableId::new(100).unwrap();
        assert_eq!(pipeline.entry_table(), Some(TableId::BASE));

        let entry = pipeline.table(TableId::BASE).unwrap();
        assert_eq!(entry.name.as_deref(), Some("vlan"));
        assert_eq!(entry.miss_target, Some(t100));
        assert!(entry.instructions_miss.contains(&InstructionType::GotoTable));
        // The miss target is a goto target without listing it in next_tables.
        assert!(entry.next_tables.is_empty());
        assert!(entry.supports_next_table(CapabilityClass::Instructions, t100));

        let last = pipeline.table(t100).unwrap();
        assert!(last.apply_actions.contains(&ActionType::SetField));
        assert!(last.apply_setfield.contains(&FieldType::VlanPcp));
    }

    #[test]
    fn test_json_matches_yaml() {
        let yaml = PipelineConfig::from_yaml(YAML).unwrap();
        let json = serde_json::to_string(&yaml).unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), yaml);
    }

    #[test]
    fn test_from_pipeline_keeps_order() {
        let pipeline = PipelineConfig::from_yaml(YAML).unwrap().to_pipeline().unwrap();
        let config = PipelineConfig::from(&pipeline);
        let ids: Vec<_> = config.tables.iter().map(|t| t.table_id).collect();
        assert_eq!(ids, vec![TableId::BASE, TableId::new(100).unwrap()]);
        assert_eq!(config, PipelineConfig::from_yaml(YAML).unwrap());
    }

    #[test]
    fn test_invalid_wiring_rejected() {
        let json = r#"{"tables": [{"table_id": 0, "miss_target": 5}]}"#;
        let config = PipelineConfig::from_json(json).unwrap();
        assert!(matches!(
            Pipeline::try_from(config),
            Err(PipelineError::UnknownMissTarget { .. })
        ));
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            PipelineConfig::from_json("{\"tables\": 3}"),
            Err(PipelineError::Json(_))
        ));
        assert!(matches!(
            PipelineConfig::from_yaml("tables: [{table_id: 255}]"),
            Err(PipelineError::Yaml(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("of-pipeline-config-test.toml");
        std::fs::write(&path, "tables = []").unwrap();
        let result = PipelineConfig::from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(PipelineError::UnsupportedFormat(_))));
    }
}
