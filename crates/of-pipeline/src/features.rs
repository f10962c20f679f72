//! Table features: the capability description of one flow table.
//!
//! A table's features say what match fields it supports, which
//! instructions and actions it accepts under each capability class, which
//! fields set-field may rewrite, and which tables it may jump to.

use of_flow::{ActionType, FieldType, InstructionType};
use of_types::TableId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::capability::{CapabilityClass, CapabilityKind};
use crate::context::TableContext;

/// Capability description of a single table.
///
/// Every set defaults to empty when deserialized, so a configuration file
/// only lists what a table supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFeatures {
    pub table_id: TableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub match_fields: BTreeSet<FieldType>,
    #[serde(default)]
    pub instructions: BTreeSet<InstructionType>,
    #[serde(default)]
    pub instructions_miss: BTreeSet<InstructionType>,
    #[serde(default)]
    pub apply_actions: BTreeSet<ActionType>,
    #[serde(default)]
    pub apply_actions_miss: BTreeSet<ActionType>,
    #[serde(default)]
    pub write_actions: BTreeSet<ActionType>,
    #[serde(default)]
    pub write_actions_miss: BTreeSet<ActionType>,
    #[serde(default)]
    pub apply_setfield: BTreeSet<FieldType>,
    #[serde(default)]
    pub apply_setfield_miss: BTreeSet<FieldType>,
    #[serde(default)]
    pub write_setfield: BTreeSet<FieldType>,
    #[serde(default)]
    pub write_setfield_miss: BTreeSet<FieldType>,
    /// Tables a regular rule may goto, besides the miss target.
    #[serde(default)]
    pub next_tables: BTreeSet<TableId>,
    /// Table a miss continues to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss_target: Option<TableId>,
}

impl TableFeatures {
    /// Creates a table that supports nothing.
    pub fn new(table_id: TableId) -> Self {
        Self {
            table_id,
            name: None,
            match_fields: BTreeSet::new(),
            instructions: BTreeSet::new(),
            instructions_miss: BTreeSet::new(),
            apply_actions: BTreeSet::new(),
            apply_actions_miss: BTreeSet::new(),
            write_actions: BTreeSet::new(),
            write_actions_miss: BTreeSet::new(),
            apply_setfield: BTreeSet::new(),
            apply_setfield_miss: BTreeSet::new(),
            write_setfield: BTreeSet::new(),
            write_setfield_miss: BTreeSet::new(),
            next_tables: BTreeSet::new(),
            miss_target: None,
        }
    }

    /// Starts building features for a table.
    pub fn builder(table_id: TableId) -> TableFeaturesBuilder {
        TableFeaturesBuilder::new(table_id)
    }

    fn instruction_set(&self, class: CapabilityClass) -> Option<&BTreeSet<InstructionType>> {
        match class {
            CapabilityClass::Instructions => Some(&self.instructions),
            CapabilityClass::InstructionsMiss => Some(&self.instructions_miss),
            _ => None,
        }
    }

    fn action_set(&self, class: CapabilityClass) -> Option<&BTreeSet<ActionType>> {
        match class {
            CapabilityClass::Apply => Some(&self.apply_actions),
            CapabilityClass::ApplyMiss => Some(&self.apply_actions_miss),
            CapabilityClass::Write => Some(&self.write_actions),
            CapabilityClass::WriteMiss => Some(&self.write_actions_miss),
            _ => None,
        }
    }

    fn setfield_set(&self, class: CapabilityClass) -> Option<&BTreeSet<FieldType>> {
        match class {
            CapabilityClass::Apply => Some(&self.apply_setfield),
            CapabilityClass::ApplyMiss => Some(&self.apply_setfield_miss),
            CapabilityClass::Write => Some(&self.write_setfield),
            CapabilityClass::WriteMiss => Some(&self.write_setfield_miss),
            _ => None,
        }
    }
}

impl TableContext for TableFeatures {
    fn table_id(&self) -> TableId {
        self.table_id
    }

    fn supports_match_field(&self, field: FieldType) -> bool {
        self.match_fields.contains(&field)
    }

    fn supports_capability(&self, class: CapabilityClass, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::Instruction(it) => self
                .instruction_set(class)
                .is_some_and(|set| set.contains(&it)),
            CapabilityKind::Action(at) => self
                .action_set(class)
                .is_some_and(|set| set.contains(&at)),
        }
    }

    fn supports_set_field(&self, class: CapabilityClass, field: FieldType) -> bool {
        self.setfield_set(class)
            .is_some_and(|set| set.contains(&field))
    }

    fn supports_next_table(&self, class: CapabilityClass, target: TableId) -> bool {
        match class {
            CapabilityClass::Instructions => {
                self.miss_target == Some(target) || self.next_tables.contains(&target)
            }
            CapabilityClass::InstructionsMiss => self.miss_target == Some(target),
            _ => false,
        }
    }

    fn miss_target(&self) -> Option<TableId> {
        self.miss_target
    }
}

impl fmt::Display for TableFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table({}", self.table_id)?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        write!(
            f,
            ", matches={}, instructions={}",
            self.match_fields.len(),
            self.instructions.len()
        )?;
        match self.miss_target {
            Some(target) => write!(f, ", miss->{})", target),
            None => write!(f, ")"),
        }
    }
}

/// Builder for [`TableFeatures`].
///
/// Uses a fluent API. A table that chains on miss can always be jumped to
/// explicitly, so the miss target never needs repeating in the next tables.
#[derive(Debug, Clone)]
pub struct TableFeaturesBuilder {
    features: TableFeatures,
}

impl TableFeaturesBuilder {
    /// Creates a builder for the given table.
    pub fn new(table_id: TableId) -> Self {
        Self {
            features: TableFeatures::new(table_id),
        }
    }

    /// Sets a descriptive name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.features.name = Some(name.into());
        self
    }

    /// Adds supported match fields.
    pub fn with_matches(mut self, fields: impl IntoIterator<Item = FieldType>) -> Self {
        self.features.match_fields.extend(fields);
        self
    }

    /// Adds instructions supported on regular rules.
    pub fn with_instructions(mut self, kinds: impl IntoIterator<Item = InstructionType>) -> Self {
        self.features.instructions.extend(kinds);
        self
    }

    /// Adds instructions supported on the table-miss rule.
    pub fn with_miss_instructions(
        mut self,
        kinds: impl IntoIterator<Item = InstructionType>,
    ) -> Self {
        self.features.instructions_miss.extend(kinds);
        self
    }

    /// Adds actions accepted in apply-actions.
    pub fn with_apply_actions(mut self, kinds: impl IntoIterator<Item = ActionType>) -> Self {
        self.features.apply_actions.extend(kinds);
        self
    }

    /// Adds actions accepted in apply-actions of the table-miss rule.
    pub fn with_miss_apply_actions(mut self, kinds: impl IntoIterator<Item = ActionType>) -> Self {
        self.features.apply_actions_miss.extend(kinds);
        self
    }

    /// Adds actions accepted in write-actions.
    pub fn with_write_actions(mut self, kinds: impl IntoIterator<Item = ActionType>) -> Self {
        self.features.write_actions.extend(kinds);
        self
    }

    /// Adds actions accepted in write-actions of the table-miss rule.
    pub fn with_miss_write_actions(mut self, kinds: impl IntoIterator<Item = ActionType>) -> Self {
        self.features.write_actions_miss.extend(kinds);
        self
    }

    /// Adds fields set-field may rewrite under the given apply/write class.
    ///
    /// Instruction classes carry no set-field capability and are ignored.
    pub fn with_set_fields(
        mut self,
        class: CapabilityClass,
        fields: impl IntoIterator<Item = FieldType>,
    ) -> Self {
        let set = match class {
            CapabilityClass::Apply => &mut self.features.apply_setfield,
            CapabilityClass::ApplyMiss => &mut self.features.apply_setfield_miss,
            CapabilityClass::Write => &mut self.features.write_setfield,
            CapabilityClass::WriteMiss => &mut self.features.write_setfield_miss,
            CapabilityClass::Instructions | CapabilityClass::InstructionsMiss => return self,
        };
        set.extend(fields);
        self
    }

    /// Adds tables a regular rule may goto.
    pub fn with_next_tables(mut self, tables: impl IntoIterator<Item = TableId>) -> Self {
        self.features.next_tables.extend(tables);
        self
    }

    /// Sets the miss-chain target.
    pub fn with_miss_target(mut self, target: TableId) -> Self {
        self.features.miss_target = Some(target);
        self
    }

    /// Builds the table features.
    pub fn build(self) -> TableFeatures {
        self.features
    }
}
