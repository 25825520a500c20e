//! Workspace cluster registry
//!
//! This crate records which workspace clusters each application cluster may
//! observe, govern and schedule onto. Every record is scoped by the pair
//! (workspace cluster name, application cluster name). It is consumed by the
//! `wscctl` operator CLI but can also back schedulers or reconciliation loops.

pub mod cluster;
pub mod db;
pub mod error;
pub mod registry;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cluster::{AdmissionConstraint, TlsConfig, WorkspaceCluster, WorkspaceClusterState};
pub use error::{RegistryError, Result};
pub use registry::{ClusterRegistry, WorkspaceClusterFilter};
