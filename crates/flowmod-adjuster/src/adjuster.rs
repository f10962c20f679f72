//! Flow mod adjuster: per-device entry point selecting a placement strategy.

use of_flow::FlowMod;
use of_pipeline::{Pipeline, PipelineDefinition};
use of_types::ProtocolVersion;
use once_cell::sync::OnceCell;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AdjusterConfig;
use crate::error::{AdjustError, Result};
use crate::multi_table::MultiTable;
use crate::single_table::SingleTable;

/// How flows are placed for one protocol generation.
pub trait PlacementStrategy: Send + Sync + Debug {
    /// Places a flow, returning the concrete rules to install.
    fn adjust(&self, flow: &FlowMod) -> Result<Vec<FlowMod>>;

    /// Table-miss flows for the whole pipeline.
    fn defaults(&self, hybrid_mode: bool) -> Result<Vec<FlowMod>>;
}

#[derive(Debug)]
struct Configured {
    version: ProtocolVersion,
    hybrid_mode: bool,
    strategy: Box<dyn PlacementStrategy>,
}

/// Adjusts flow mods to a device's table pipeline.
///
/// Configured exactly once, after which [`adjust`](Self::adjust) and
/// [`defaults`](Self::defaults) are pure and may be called from any number
/// of threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use flowmod_adjuster::FlowModAdjuster;
/// use of_flow::{Action, FlowMod};
/// use of_pipeline::Pipeline;
/// use of_types::{PortNumber, ProtocolVersion};
///
/// let adjuster = FlowModAdjuster::new();
/// adjuster
///     .configure(ProtocolVersion::V1_0, Arc::new(Pipeline::empty()), true)
///     .unwrap();
///
/// let flow = FlowMod::builder()
///     .action(Action::output(PortNumber::NORMAL))
///     .build()
///     .unwrap();
/// assert_eq!(adjuster.adjust(&flow).unwrap(), vec![flow]);
/// ```
#[derive(Debug, Default)]
pub struct FlowModAdjuster {
    configured: OnceCell<Configured>,
}

impl FlowModAdjuster {
    /// Creates an unconfigured adjuster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and configures an adjuster from configuration.
    pub fn from_config(config: &AdjusterConfig) -> Result<Self> {
        let pipeline = match &config.pipeline {
            Some(pipeline) => pipeline.to_pipeline()?,
            None => Pipeline::empty(),
        };
        let adjuster = Self::new();
        adjuster.configure(config.version, Arc::new(pipeline), config.hybrid_mode)?;
        Ok(adjuster)
    }

    /// Selects the placement strategy for the negotiated protocol version.
    ///
    /// # Errors
    ///
    /// [`AdjustError::AlreadyConfigured`] on a second call, and
    /// [`AdjustError::VersionNotSupported`] for 1.1 and 1.2.
    pub fn configure(
        &self,
        version: ProtocolVersion,
        pipeline: Arc<dyn PipelineDefinition>,
        hybrid_mode: bool,
    ) -> Result<()> {
        if self.configured.get().is_some() {
            warn!(%version, "flow mod adjuster configured twice");
            return Err(AdjustError::AlreadyConfigured);
        }

        let strategy: Box<dyn PlacementStrategy> = match version {
            ProtocolVersion::V1_0 => Box::new(SingleTable),
            ProtocolVersion::V1_3 => Box::new(MultiTable::new(pipeline, hybrid_mode)),
            ProtocolVersion::V1_1 | ProtocolVersion::V1_2 => {
                warn!(%version, "unsupported protocol version");
                return Err(AdjustError::VersionNotSupported(version));
            }
        };

        self.configured
            .set(Configured {
                version,
                hybrid_mode,
                strategy,
            })
            .map_err(|_| AdjustError::AlreadyConfigured)?;
        debug!(%version, hybrid_mode, "flow mod adjuster configured");
        Ok(())
    }

    fn configured(&self) -> Result<&Configured> {
        self.configured.get().ok_or_else(|| {
            warn!("flow mod adjuster used before configure");
            AdjustError::NotConfigured
        })
    }

    pub fn is_configured(&self) -> bool {
        self.configured.get().is_some()
    }

    /// Negotiated protocol version, once configured.
    pub fn version(&self) -> Option<ProtocolVersion> {
        self.configured.get().map(|c| c.version)
    }

    /// Configured hybrid mode, once configured.
    pub fn hybrid_mode(&self) -> Option<bool> {
        self.configured.get().map(|c| c.hybrid_mode)
    }

    /// Places a flow into the pipeline.
    ///
    /// Returns zero, one or more rules, each assigned to a table (except on
    /// single-table devices, where the flow is returned untouched).
    pub fn adjust(&self, flow: &FlowMod) -> Result<Vec<FlowMod>> {
        self.configured()?.strategy.adjust(flow)
    }

    /// Table-miss flows for the device.
    pub fn defaults(&self, hybrid_mode: bool) -> Result<Vec<FlowMod>> {
        self.configured()?.strategy.defaults(hybrid_mode)
    }
}
