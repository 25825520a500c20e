//! Common test utilities and helpers for wsc-registry tests

#![allow(dead_code)]

use wsc_registry::test_utils::create_test_db;
use wsc_registry::{ClusterRegistry, WorkspaceCluster, WorkspaceClusterState};

/// Create a registry backed by a fresh in-memory database
pub async fn create_test_registry() -> ClusterRegistry {
    ClusterRegistry::new(create_test_db().await)
}

/// Build a record with explicit state and score
pub fn cluster(
    name: &str,
    application_cluster: &str,
    state: WorkspaceClusterState,
    score: u32,
    govern: bool,
) -> WorkspaceCluster {
    WorkspaceCluster {
        state,
        score,
        max_score: score,
        govern,
        ..WorkspaceCluster::new(name, application_cluster, "some-url")
    }
}

/// Fixture: eu71 (available, governing) and us71 (cordoned) both under eu02
pub async fn fixture_two_clusters_under_eu02(registry: &ClusterRegistry) {
    registry
        .save(&cluster(
            "eu71",
            "eu02",
            WorkspaceClusterState::Available,
            100,
            true,
        ))
        .await
        .expect("Failed to save eu71");
    registry
        .save(&cluster(
            "us71",
            "eu02",
            WorkspaceClusterState::Cordoned,
            0,
            false,
        ))
        .await
        .expect("Failed to save us71");
}
