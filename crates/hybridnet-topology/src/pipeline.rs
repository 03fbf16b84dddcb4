//! End-to-end assembly: resolve, validate, build, bind.
//!
//! Each stage runs exactly once and strictly after the previous one. Any
//! error aborts the run before a topology is returned.

use hybridnet_common::config::AssemblerConfig;
use hybridnet_common::error::Result;
use hybridnet_common::types::Fingerprint;

use crate::builder::{Topology, TopologyBuilder};
use crate::outputs::{self, OutputSet};
use crate::params::{ParameterResolver, ParameterSet};
use crate::provisioner::{Manifest, Provisioner};
use crate::validator::{self, ValidatedConfig};
use crate::zone::ZoneLookup;

/// Result of one assembly run.
#[derive(Debug)]
pub struct Assembly {
    /// The validated configuration.
    pub config: ValidatedConfig,
    /// The assembled topology.
    pub topology: Topology,
    /// Output bindings.
    pub outputs: OutputSet,
}

impl Assembly {
    /// Fingerprint of the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        self.config.resolved().fingerprint()
    }

    /// Renders the deployment manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph cannot be ordered or serialization fails.
    pub fn manifest(&self) -> Result<Manifest> {
        Ok(Manifest {
            fingerprint: self.fingerprint()?,
            resources: self
                .topology
                .graph()
                .resolve_order()?
                .into_iter()
                .cloned()
                .collect(),
            outputs: self.outputs.clone(),
        })
    }
}

/// Runs the full assembly pipeline.
#[derive(Debug)]
pub struct Assembler<Z> {
    config: AssemblerConfig,
    zones: Z,
}

impl<Z: ZoneLookup> Assembler<Z> {
    /// Creates an assembler using `zones` for DNS zone lookup.
    #[must_use]
    pub const fn new(config: AssemblerConfig, zones: Z) -> Self {
        Self { config, zones }
    }

    /// Assembles the topology described by `params`.
    ///
    /// # Errors
    ///
    /// Returns a missing-parameter or invalid-configuration error if the
    /// parameters are unusable, or a zone-lookup error from the collaborator.
    pub fn assemble(&self, params: &ParameterSet) -> Result<Assembly> {
        let resolved = ParameterResolver::new(self.config.parse_policy).resolve(params)?;
        let config = validator::validate(resolved)?;
        let topology = TopologyBuilder::new(&self.zones, &self.config.managed_by).build(&config)?;
        let outputs = outputs::bind(&topology);
        Ok(Assembly {
            config,
            topology,
            outputs,
        })
    }

    /// Assembles `params` and submits the manifest to `provisioner`.
    ///
    /// # Errors
    ///
    /// Returns any assembly error, or the provisioner's rejection.
    pub fn deploy(
        &self,
        params: &ParameterSet,
        provisioner: &mut impl Provisioner,
    ) -> Result<OutputSet> {
        let assembly = self.assemble(params)?;
        let manifest = assembly.manifest()?;
        tracing::info!(
            fingerprint = %manifest.fingerprint,
            resources = manifest.resources.len(),
            "submitting manifest"
        );
        provisioner.submit(&manifest)?;
        Ok(assembly.outputs)
    }
}
