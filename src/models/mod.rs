//! Placement domain models.
//!
//! Descriptors supplied by the surrounding simulation (hosts and virtual
//! machines with four-dimensional capacity/demand) and the pairwise
//! communication model the optimizer scores locality against.
//!
//! # Domain Mappings
//!
//! | u-placement | Cloud | HPC | Edge |
//! |-------------|-------|-----|------|
//! | ResourceNode | Physical host | Compute node | Gateway |
//! | WorkloadUnit | Virtual machine | Job | Container |
//! | CommunicationMatrix | Inter-VM traffic | MPI traffic | Service calls |

mod communication;
mod resource;

pub use communication::{CommunicationMatrix, MAX_INTENSITY, MIN_INTENSITY};
pub use resource::{DIMENSIONS, ResourceNode, Resources, WorkloadUnit};
