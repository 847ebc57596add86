//! Energy-aware workload placement for the U-Engine ecosystem.
//!
//! Places virtual machines (workload units) onto physical hosts (resource
//! nodes) with a genetic algorithm whose cost favors fewer powered-on hosts
//! while penalizing overload, wasted capacity and split communication.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Resources`, `ResourceNode`, `WorkloadUnit`,
//!   `CommunicationMatrix`
//! - **`ga`**: Genome, fitness, operators and the generational engine
//! - **`validation`**: Input integrity checks (duplicate IDs, bad capacities)
//! - **`report`**: Utilization and overload metrics of a finished placement
//!
//! # Architecture
//!
//! The crate stops at the placement decision. Creating hosts and VMs,
//! running the execution simulation and presenting results belong to the
//! caller, which hands in descriptors and applies the returned mapping.
//!
//! # References
//!
//! - Beloglazov et al. (2012), "Energy-aware resource allocation heuristics
//!   for efficient management of data centers for cloud computing"
//! - Xu & Fortes (2010), "Multi-objective virtual machine placement in
//!   virtualized data center environments"

pub mod error;
pub mod ga;
pub mod models;
pub mod report;
pub mod validation;

pub use error::{PlacementError, Result};
