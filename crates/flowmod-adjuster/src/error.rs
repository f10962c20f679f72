//! Error types for flow adjustment.
//!
//! Errors fall into two groups. The flow-unsupported group means the device
//! cannot host the flow as given; retrying with the same flow and pipeline
//! will fail the same way. The remaining variants are misuse of the adjuster
//! or a bad configuration.

use itertools::Itertools;
use of_flow::FieldType;
use of_pipeline::{CapabilityKind, PipelineError};
use of_types::{ProtocolVersion, TableId};
use thiserror::Error;

/// Result type alias for adjuster operations.
pub type Result<T> = std::result::Result<T, AdjustError>;

/// Errors raised while configuring the adjuster or placing a flow.
#[derive(Debug, Error)]
pub enum AdjustError {
    /// No table along the reachable miss chain accepts this kind.
    #[error("Flow unsupported: table {table} does not support {kind}")]
    UnsupportedInstruction {
        /// Offending instruction or action kind.
        kind: CapabilityKind,
        /// Last table examined.
        table: TableId,
    },

    /// A table matches only part of the flow and has nowhere to chain the rest.
    #[error(
        "Flow unsupported: table {table} cannot match on [{}] and has no miss target",
        .fields.iter().join(", ")
    )]
    UnsupportedMatch {
        /// Fields the table cannot match on.
        fields: Vec<FieldType>,
        table: TableId,
    },

    /// The miss chain came back to a table already visited.
    #[error("Flow unsupported: miss chain revisits table {table}")]
    MissChainCycle { table: TableId },

    /// The pipeline has no capability information for a table it refers to.
    #[error("Flow unsupported: no capability information for table {table}")]
    UnknownTable { table: TableId },

    #[error("Flow mod adjuster used before it was configured")]
    NotConfigured,

    #[error("Flow mod adjuster is already configured")]
    AlreadyConfigured,

    /// Only the single-table (1.0) and multi-table (1.3) generations are handled.
    #[error("Protocol version {0} is not supported")]
    VersionNotSupported(ProtocolVersion),

    /// Pipeline configuration could not be loaded.
    #[error("Pipeline configuration error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AdjustError {
    pub fn unsupported(kind: impl Into<CapabilityKind>, table: TableId) -> Self {
        Self::UnsupportedInstruction {
            kind: kind.into(),
            table,
        }
    }

    /// Returns true if the device cannot host the flow, as opposed to the
    /// adjuster being misused or misconfigured.
    pub fn is_flow_unsupported(&self) -> bool {
        matches!(
            self,
            AdjustError::UnsupportedInstruction { .. }
                | AdjustError::UnsupportedMatch { .. }
                | AdjustError::MissChainCycle { .. }
                | AdjustError::UnknownTable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use of_flow::{ActionType, InstructionType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let table = TableId::new(100).unwrap();
        let err = AdjustError::unsupported(InstructionType::ClearActions, table);
        assert_eq!(
            err.to_string(),
            "Flow unsupported: table 100 does not support instruction CLEAR_ACTIONS"
        );

        let err = AdjustError::UnsupportedMatch {
            fields: vec![FieldType::VlanPcp, FieldType::Ipv4Dst],
            table: TableId::BASE,
        };
        assert_eq!(
            err.to_string(),
            "Flow unsupported: table 0 cannot match on [VLAN_PCP, IPV4_DST] and has no miss target"
        );
    }

    #[test]
    fn test_is_flow_unsupported() {
        let table = TableId::BASE;
        assert!(AdjustError::unsupported(ActionType::Group, table).is_flow_unsupported());
        assert!(AdjustError::MissChainCycle { table }.is_flow_unsupported());
        assert!(AdjustError::UnknownTable { table }.is_flow_unsupported());
        assert!(!AdjustError::NotConfigured.is_flow_unsupported());
        assert!(!AdjustError::AlreadyConfigured.is_flow_unsupported());
        assert!(!AdjustError::VersionNotSupported(ProtocolVersion::V1_1).is_flow_unsupported());
    }
}
