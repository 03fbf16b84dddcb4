//! # hybridnet-topology
//!
//! Parameter resolution and resource-graph assembly for hybrid network
//! deployments.
//!
//! Handles, strictly in this order:
//! - **Params**: typed coercion of raw name → string parameters.
//! - **Validator**: cross-field rules such as the naming-gated domain.
//! - **Builder**: the network, compute, connectivity, storage and naming
//!   groups, assembled into one dependency graph.
//! - **Outputs**: named bindings for every enabled group.
//!
//! # Example
//!
//! ```rust
//! use hybridnet_common::config::AssemblerConfig;
//! use hybridnet_topology::params::ParameterSet;
//! use hybridnet_topology::pipeline::Assembler;
//! use hybridnet_topology::zone::StaticZones;
//!
//! let params = ParameterSet::new()
//!     .with("ssh_ip", "203.0.113.10/32")
//!     .with("key_pair", "k1")
//!     .with("peer_ip", "198.51.100.20")
//!     .with("psk", "secret")
//!     .with("remote_cidr", "10.1.0.0/16");
//!
//! let assembler = Assembler::new(AssemblerConfig::default(), StaticZones::new());
//! let assembly = assembler.assemble(&params)?;
//! assert!(assembly.outputs.contains("tunnel_id"));
//! # Ok::<(), hybridnet_common::error::HybridnetError>(())
//! ```

pub mod builder;
pub mod graph;
pub mod outputs;
pub mod params;
pub mod pipeline;
pub mod provisioner;
pub mod resources;
pub mod tunnel;
pub mod validator;
pub mod zone;
