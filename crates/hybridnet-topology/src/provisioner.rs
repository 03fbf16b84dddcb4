//! Hand-off to the provisioning backend.
//!
//! The assembler never provisions anything itself. It renders a
//! [`Manifest`] and submits it to whatever [`Provisioner`] the caller
//! supplies.

use hybridnet_common::error::Result;
use hybridnet_common::types::Fingerprint;
use serde::Serialize;

use crate::graph::ResourceNode;
use crate::outputs::OutputSet;

/// Declarative deployment description handed to a provisioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Fingerprint of the resolved configuration that produced this manifest.
    pub fingerprint: Fingerprint,
    /// Resource nodes in deployment order.
    pub resources: Vec<ResourceNode>,
    /// Output contract.
    pub outputs: OutputSet,
}

/// Backend that turns a manifest into live infrastructure.
///
/// Implementors own lifecycle (create, update, destroy), retries and
/// secret storage.
pub trait Provisioner {
    /// Submits a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the manifest.
    fn submit(&mut self, manifest: &Manifest) -> Result<()>;
}

/// Provisioner that keeps every submitted manifest in memory.
#[derive(Debug, Default)]
pub struct RecordingProvisioner {
    submitted: Vec<Manifest>,
}

impl RecordingProvisioner {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifests submitted so far.
    #[must_use]
    pub fn submitted(&self) -> &[Manifest] {
        &self.submitted
    }
}

impl Provisioner for RecordingProvisioner {
    fn submit(&mut self, manifest: &Manifest) -> Result<()> {
        tracing::debug!(
            fingerprint = %manifest.fingerprint,
            resources = manifest.resources.len(),
            "recording manifest"
        );
        self.submitted.push(manifest.clone());
        Ok(())
    }
}
