use super::CommandContext;
use crate::cli::UpdateSubcommand;
use anyhow::{bail, Result};
use std::io::Write;
use tracing::info;
use wsc_registry::{ClusterRegistry, RegistryError, WorkspaceCluster, WorkspaceClusterState};

pub async fn register(
    registry: &ClusterRegistry,
    cluster: &WorkspaceCluster,
    out: &mut impl Write,
) -> Result<()> {
    registry.save(cluster).await?;
    info!(
        cluster = %cluster.name,
        application_cluster = %cluster.application_cluster,
        "registered workspace cluster"
    );

    writeln!(
        out,
        "registered workspace cluster {} (application cluster {})",
        cluster.name, cluster.application_cluster
    )?;
    Ok(())
}

pub async fn cordon(
    registry: &ClusterRegistry,
    name: &str,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    transition(
        registry,
        name,
        ctx,
        out,
        WorkspaceClusterState::Available,
        WorkspaceClusterState::Cordoned,
    )
    .await
}

pub async fn uncordon(
    registry: &ClusterRegistry,
    name: &str,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    transition(
        registry,
        name,
        ctx,
        out,
        WorkspaceClusterState::Cordoned,
        WorkspaceClusterState::Available,
    )
    .await
}

/// Draining is reachable from any other state.
pub async fn drain(
    registry: &ClusterRegistry,
    name: &str,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    let application_cluster = ctx.require_application_cluster()?;
    let current = find_existing(registry, name, application_cluster).await?;

    transition(
        registry,
        name,
        ctx,
        out,
        current.state,
        WorkspaceClusterState::Draining,
    )
    .await
}

async fn transition(
    registry: &ClusterRegistry,
    name: &str,
    ctx: &CommandContext,
    out: &mut impl Write,
    from: WorkspaceClusterState,
    to: WorkspaceClusterState,
) -> Result<()> {
    let application_cluster = ctx.require_application_cluster()?;

    if from != to
        && registry
            .transition_state(name, application_cluster, from, to)
            .await?
    {
        info!(cluster = name, application_cluster, %from, %to, "workspace cluster state changed");
        writeln!(
            out,
            "{} workspace cluster {} (application cluster {})",
            to, name, application_cluster
        )?;
        return Ok(());
    }

    // Nothing changed: report why
    let current = find_existing(registry, name, application_cluster).await?;
    if current.state == to {
        writeln!(
            out,
            "workspace cluster {} is already {} (application cluster {})",
            name, to, application_cluster
        )?;
        return Ok(());
    }

    bail!(
        "workspace cluster {} is {}, expected {} (application cluster {})",
        name,
        current.state,
        from,
        application_cluster
    )
}

/// Read-modify-write of a single field. Concurrent writers to the same scope
/// resolve as last-writer-wins.
pub async fn update(
    registry: &ClusterRegistry,
    field: UpdateSubcommand,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    let application_cluster = ctx.require_application_cluster()?;

    let (name, description) = match &field {
        UpdateSubcommand::Score { name, value } => (name.clone(), format!("score={}", value)),
        UpdateSubcommand::MaxScore { name, value } => {
            (name.clone(), format!("max-score={}", value))
        }
        UpdateSubcommand::Govern { name, value } => (name.clone(), format!("govern={}", value)),
    };

    let mut cluster = find_existing(registry, &name, application_cluster).await?;
    match field {
        UpdateSubcommand::Score { value, .. } => cluster.score = value,
        UpdateSubcommand::MaxScore { value, .. } => cluster.max_score = value,
        UpdateSubcommand::Govern { value, .. } => cluster.govern = value,
    }
    registry.save(&cluster).await?;

    writeln!(
        out,
        "updated workspace cluster {} (application cluster {}): {}",
        cluster.name, application_cluster, description
    )?;
    Ok(())
}

pub async fn deregister(
    registry: &ClusterRegistry,
    name: &str,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    let application_cluster = ctx.require_application_cluster()?;

    registry.delete_by_name(name, application_cluster).await?;
    info!(cluster = name, application_cluster, "deregistered workspace cluster");

    writeln!(
        out,
        "deregistered workspace cluster {} (application cluster {})",
        name, application_cluster
    )?;
    Ok(())
}

async fn find_existing(
    registry: &ClusterRegistry,
    name: &str,
    application_cluster: &str,
) -> Result<WorkspaceCluster> {
    let cluster = registry
        .find_by_name(name, application_cluster)
        .await?
        .ok_or_else(|| RegistryError::not_found(name, application_cluster))?;
    Ok(cluster)
}
