use super::output::{write_cluster, write_clusters};
use super::CommandContext;
use anyhow::Result;
use std::io::Write;
use tracing::debug;
use wsc_registry::{ClusterRegistry, RegistryError, WorkspaceClusterFilter};

pub async fn list(
    registry: &ClusterRegistry,
    filter: &WorkspaceClusterFilter,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    let clusters = registry.find_filtered(filter).await?;
    debug!(count = clusters.len(), "listed workspace clusters");

    write_clusters(out, ctx.output, &clusters)
}

pub async fn get(
    registry: &ClusterRegistry,
    name: &str,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    let application_cluster = ctx.require_application_cluster()?;

    let cluster = registry
        .find_by_name(name, application_cluster)
        .await?
        .ok_or_else(|| RegistryError::not_found(name, application_cluster))?;

    write_cluster(out, ctx.output, &cluster)
}
