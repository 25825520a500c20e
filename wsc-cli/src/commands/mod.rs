// Command dispatch for wscctl

use crate::cli::{Command, OutputFormat};
use anyhow::{anyhow, Result};
use std::io::Write;
use wsc_registry::ClusterRegistry;

mod lifecycle;
mod output;
mod query;

/// Values every command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub application_cluster: Option<String>,
    pub output: OutputFormat,
}

impl CommandContext {
    /// The application cluster scoped commands act on.
    pub fn require_application_cluster(&self) -> Result<&str> {
        self.application_cluster.as_deref().ok_or_else(|| {
            anyhow!(
                "No application cluster configured; pass --application-cluster or set WSCCTL_APPLICATION_CLUSTER"
            )
        })
    }
}

/// Run one registry command, writing its human or JSON output to `out`.
///
/// `migrate` is handled by the binary before a registry exists.
pub async fn execute_command(
    registry: &ClusterRegistry,
    command: Command,
    ctx: &CommandContext,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List {
            name,
            state,
            govern,
            min_score,
            all_scopes,
        } => {
            let application_cluster = if all_scopes {
                None
            } else {
                Some(ctx.require_application_cluster()?.to_string())
            };
            let filter = wsc_registry::WorkspaceClusterFilter {
                name,
                application_cluster,
                state,
                govern,
                min_score,
                ..Default::default()
            };
            query::list(registry, &filter, ctx, out).await
        }
        Command::Get { name } => query::get(registry, &name, ctx, out).await,
        Command::Register {
            name,
            url,
            tls_ca,
            tls_crt,
            state,
            score,
            max_score,
            govern,
            admission_constraints,
        } => {
            let application_cluster = ctx.require_application_cluster()?;
            let tls = match (tls_ca, tls_crt) {
                (Some(ca), Some(crt)) => Some(wsc_registry::TlsConfig { ca, crt }),
                _ => None,
            };
            let cluster = wsc_registry::WorkspaceCluster {
                tls,
                state,
                score,
                max_score,
                govern,
                admission_constraints,
                ..wsc_registry::WorkspaceCluster::new(name, application_cluster, url)
            };
            lifecycle::register(registry, &cluster, out).await
        }
        Command::Cordon { name } => lifecycle::cordon(registry, &name, ctx, out).await,
        Command::Uncordon { name } => lifecycle::uncordon(registry, &name, ctx, out).await,
        Command::Drain { name } => lifecycle::drain(registry, &name, ctx, out).await,
        Command::Update { field } => lifecycle::update(registry, field, ctx, out).await,
        Command::Deregister { name } => lifecycle::deregister(registry, &name, ctx, out).await,
        Command::Migrate => Err(anyhow!("migrate runs before the registry is opened")),
    }
}
