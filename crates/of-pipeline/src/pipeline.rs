//! In-memory pipeline: ordered tables with validated miss wiring.

use itertools::Itertools;
use log::warn;
use of_types::TableId;
use std::collections::HashMap;
use std::fmt;

use crate::context::{PipelineDefinition, TableContext};
use crate::error::{PipelineError, Result};
use crate::features::TableFeatures;

/// Ordered set of tables for one device.
///
/// The first table added is the entry table. A pipeline with no tables is
/// valid and means no table information is known.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    order: Vec<TableId>,
    tables: HashMap<TableId, TableFeatures>,
}

impl Pipeline {
    /// Returns a pipeline with no table information.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts building a pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Returns the features of a table.
    pub fn table(&self, table: TableId) -> Option<&TableFeatures> {
        self.tables.get(&table)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl PipelineDefinition for Pipeline {
    fn has_tables(&self) -> bool {
        !self.order.is_empty()
    }

    fn table_ids(&self) -> Vec<TableId> {
        self.order.clone()
    }

    fn table_context(&self, table: TableId) -> Option<&dyn TableContext> {
        self.tables.get(&table).map(|t| t as &dyn TableContext)
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pipeline[{}]", self.order.iter().join(","))
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    tables: Vec<TableFeatures>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a table; order of addition is pipeline order.
    pub fn with_table(mut self, table: TableFeatures) -> Self {
        self.tables.push(table);
        self
    }

    /// Appends several tables.
    pub fn with_tables(mut self, tables: impl IntoIterator<Item = TableFeatures>) -> Self {
        self.tables.extend(tables);
        self
    }

    /// Builds the pipeline, validating table ids and miss wiring.
    ///
    /// A miss target that points back to an earlier table is accepted but
    /// logged, since devices only chain forward.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DuplicateTable`],
    /// [`PipelineError::SelfMissTarget`] or
    /// [`PipelineError::UnknownMissTarget`].
    pub fn build(self) -> Result<Pipeline> {
        let mut order = Vec::with_capacity(self.tables.len());
        let mut tables = HashMap::with_capacity(self.tables.len());

        for table in self.tables {
            let tid = table.table_id;
            if tables.contains_key(&tid) {
                return Err(PipelineError::DuplicateTable(tid));
            }
            order.push(tid);
            tables.insert(tid, table);
        }

        for tid in &order {
            let Some(target) = tables.get(tid).and_then(|t| t.miss_target) else {
                continue;
            };
            if target == *tid {
                return Err(PipelineError::SelfMissTarget(*tid));
            }
            if !tables.contains_key(&target) {
                return Err(PipelineError::UnknownMissTarget {
                    table: *tid,
                    target,
                });
            }
            if target < *tid {
                warn!("Table {} chains backwards to table {} on miss", tid, target);
            }
        }

        Ok(Pipeline { order, tables })
    }
}
