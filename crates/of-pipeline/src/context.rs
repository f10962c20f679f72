//! Query surface consumed by placement logic.

use of_flow::FieldType;
use of_types::TableId;
use std::fmt::Debug;

use crate::capability::{CapabilityClass, CapabilityKind};

/// Capability oracle for a single table.
///
/// Implementations are immutable once handed to an adjuster and are queried
/// concurrently, hence the `Send + Sync` bound.
pub trait TableContext: Send + Sync + Debug {
    /// Id of the table this context describes.
    fn table_id(&self) -> TableId;

    /// Returns true if the table can match on the given field.
    fn supports_match_field(&self, field: FieldType) -> bool;

    /// Returns true if the table accepts the kind under the given class.
    ///
    /// Instruction kinds are answered by the instruction classes and action
    /// kinds by the apply/write classes; a mismatched pairing is unsupported.
    fn supports_capability(&self, class: CapabilityClass, kind: CapabilityKind) -> bool;

    /// Returns true if a set-field action may rewrite `field` under the
    /// given apply/write class.
    fn supports_set_field(&self, class: CapabilityClass, field: FieldType) -> bool;

    /// Returns true if a goto-table instruction under the given instruction
    /// class may target `target`.
    fn supports_next_table(&self, class: CapabilityClass, target: TableId) -> bool;

    /// Table that packets continue to when nothing in this table matches.
    fn miss_target(&self) -> Option<TableId>;

    fn has_miss_target(&self) -> bool {
        self.miss_target().is_some()
    }
}

/// Topology of a device's table pipeline.
pub trait PipelineDefinition: Send + Sync + Debug {
    /// Returns false when no table information is known for the device.
    fn has_tables(&self) -> bool;

    /// Table ids in pipeline order; the first one is the entry table.
    fn table_ids(&self) -> Vec<TableId>;

    /// Capability oracle for a table, if the pipeline knows it.
    fn table_context(&self, table: TableId) -> Option<&dyn TableContext>;

    /// Entry table of the pipeline.
    fn entry_table(&self) -> Option<TableId> {
        self.table_ids().first().copied()
    }
}
