use crate::cluster::{AdmissionConstraint, TlsConfig, WorkspaceCluster, WorkspaceClusterState};
use crate::error::{RegistryError, Result};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

/// Partial predicate over workspace cluster records.
///
/// Every supplied field narrows the match; unset fields are wildcards. With both
/// `name` and `application_cluster` set the filter selects at most one record.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceClusterFilter {
    pub name: Option<String>,
    pub application_cluster: Option<String>,
    pub url: Option<String>,
    pub state: Option<WorkspaceClusterState>,
    pub govern: Option<bool>,
    /// Matches records with `score >= min_score`.
    pub min_score: Option<u32>,
}

impl WorkspaceClusterFilter {
    /// Everything visible to one application cluster.
    pub fn for_application_cluster(application_cluster: impl Into<String>) -> Self {
        Self {
            application_cluster: Some(application_cluster.into()),
            ..Default::default()
        }
    }

    /// The single scope identified by the composite key.
    pub fn scope(name: impl Into<String>, application_cluster: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            application_cluster: Some(application_cluster.into()),
            ..Default::default()
        }
    }
}

/// Durable, observer-scoped registry of workspace clusters.
///
/// Identity is always the pair (`name`, `application_cluster`). The store enforces
/// it with a composite primary key and `save` is a single atomic upsert, so
/// concurrent saves to the same scope resolve as last-writer-wins.
#[derive(Clone)]
pub struct ClusterRegistry {
    pool: SqlitePool,
}

impl ClusterRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert the record or replace every field of the record with the same scope.
    #[instrument(skip(self, cluster), fields(name = %cluster.name, application_cluster = %cluster.application_cluster))]
    pub async fn save(&self, cluster: &WorkspaceCluster) -> Result<()> {
        cluster.validate()?;

        let admission_constraints = serde_json::to_string(&cluster.admission_constraints)?;
        let (tls_ca, tls_crt) = match &cluster.tls {
            Some(tls) => (Some(tls.ca.as_str()), Some(tls.crt.as_str())),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO workspace_clusters (name, application_cluster, url, tls_ca, tls_crt, state, score, max_score, govern, admission_constraints)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (name, application_cluster) DO UPDATE SET
                url = excluded.url,
                tls_ca = excluded.tls_ca,
                tls_crt = excluded.tls_crt,
                state = excluded.state,
                score = excluded.score,
                max_score = excluded.max_score,
                govern = excluded.govern,
                admission_constraints = excluded.admission_constraints
            "#,
        )
        .bind(&cluster.name)
        .bind(&cluster.application_cluster)
        .bind(&cluster.url)
        .bind(tls_ca)
        .bind(tls_crt)
        .bind(cluster.state)
        .bind(i64::from(cluster.score))
        .bind(i64::from(cluster.max_score))
        .bind(cluster.govern)
        .bind(admission_constraints)
        .execute(&self.pool)
        .await?;

        debug!(state = %cluster.state, score = cluster.score, "saved workspace cluster");

        Ok(())
    }

    /// Look up one scope. `None` when the workspace cluster is not registered
    /// under this application cluster, even if it exists under another one.
    #[instrument(skip(self))]
    pub async fn find_by_name(
        &self,
        name: &str,
        application_cluster: &str,
    ) -> Result<Option<WorkspaceCluster>> {
        let row = sqlx::query_as::<_, WorkspaceClusterRow>(
            "SELECT * FROM workspace_clusters WHERE name = ? AND application_cluster = ?",
        )
        .bind(name)
        .bind(application_cluster)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WorkspaceCluster::try_from).transpose()
    }

    /// Remove one scope. Deleting a scope that does not exist is a no-op.
    #[instrument(skip(self))]
    pub async fn delete_by_name(&self, name: &str, application_cluster: &str) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM workspace_clusters WHERE name = ? AND application_cluster = ?",
        )
        .bind(name)
        .bind(application_cluster)
        .execute(&self.pool)
        .await?;

        debug!(
            rows_affected = result.rows_affected(),
            "deleted workspace cluster scope"
        );

        Ok(())
    }

    /// List records matching every supplied field of the filter.
    #[instrument(skip(self))]
    pub async fn find_filtered(
        &self,
        filter: &WorkspaceClusterFilter,
    ) -> Result<Vec<WorkspaceCluster>> {
        let mut query = "SELECT * FROM workspace_clusters WHERE 1=1".to_string();

        if filter.name.is_some() {
            query.push_str(" AND name = ?");
        }
        if filter.application_cluster.is_some() {
            query.push_str(" AND application_cluster = ?");
        }
        if filter.url.is_some() {
            query.push_str(" AND url = ?");
        }
        if filter.state.is_some() {
            query.push_str(" AND state = ?");
        }
        if filter.govern.is_some() {
            query.push_str(" AND govern = ?");
        }
        if filter.min_score.is_some() {
            query.push_str(" AND score >= ?");
        }

        query.push_str(" ORDER BY name, application_cluster");

        let mut q = sqlx::query_as::<_, WorkspaceClusterRow>(&query);

        if let Some(name) = &filter.name {
            q = q.bind(name);
        }
        if let Some(application_cluster) = &filter.application_cluster {
            q = q.bind(application_cluster);
        }
        if let Some(url) = &filter.url {
            q = q.bind(url);
        }
        if let Some(state) = filter.state {
            q = q.bind(state);
        }
        if let Some(govern) = filter.govern {
            q = q.bind(govern);
        }
        if let Some(min_score) = filter.min_score {
            q = q.bind(i64::from(min_score));
        }

        let rows = q.fetch_all(&self.pool).await?;

        rows.into_iter().map(WorkspaceCluster::try_from).collect()
    }

    /// Move a scope from `from` to `to` only if it is currently in `from`.
    ///
    /// Returns `false` when the scope does not exist or is in another state. This
    /// is a single conditional update, so two callers racing on the same
    /// transition cannot both succeed.
    #[instrument(skip(self))]
    pub async fn transition_state(
        &self,
        name: &str,
        application_cluster: &str,
        from: WorkspaceClusterState,
        to: WorkspaceClusterState,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE workspace_clusters
             SET state = ?
             WHERE name = ? AND application_cluster = ? AND state = ?",
        )
        .bind(to)
        .bind(name)
        .bind(application_cluster)
        .bind(from)
        .execute(&self.pool)
        .await?;

        let changed = result.rows_affected() > 0;
        debug!(changed, "workspace cluster state transition");

        Ok(changed)
    }
}

// Internal row type for sqlx
#[derive(sqlx::FromRow)]
struct WorkspaceClusterRow {
    name: String,
    application_cluster: String,
    url: String,
    tls_ca: Option<String>,
    tls_crt: Option<String>,
    state: WorkspaceClusterState,
    score: i64,
    max_score: i64,
    govern: bool,
    admission_constraints: String,
}

impl TryFrom<WorkspaceClusterRow> for WorkspaceCluster {
    type Error = RegistryError;

    fn try_from(row: WorkspaceClusterRow) -> Result<Self> {
        let tls = match (row.tls_ca, row.tls_crt) {
            (Some(ca), Some(crt)) => Some(TlsConfig { ca, crt }),
            _ => None,
        };
        let admission_constraints: Vec<AdmissionConstraint> =
            serde_json::from_str(&row.admission_constraints)?;

        Ok(Self {
            name: row.name,
            application_cluster: row.application_cluster,
            url: row.url,
            tls,
            state: row.state,
            score: decode_score(row.score)?,
            max_score: decode_score(row.max_score)?,
            govern: row.govern,
            admission_constraints,
        })
    }
}

fn decode_score(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|e| RegistryError::Database(sqlx::Error::Decode(Box::new(e))))
}
