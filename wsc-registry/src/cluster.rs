use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A workspace cluster as seen by one observing application cluster.
///
/// The pair (`name`, `application_cluster`) is the identity of a record. The same
/// workspace cluster can be registered under several application clusters, each
/// with its own state, score and governance flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceCluster {
    pub name: String,
    pub application_cluster: String,
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    pub state: WorkspaceClusterState,
    pub score: u32,
    pub max_score: u32,
    pub govern: bool,

    #[serde(default)]
    pub admission_constraints: Vec<AdmissionConstraint>,
}

impl WorkspaceCluster {
    /// New record in the `available` state with no TLS material or constraints.
    pub fn new(
        name: impl Into<String>,
        application_cluster: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            application_cluster: application_cluster.into(),
            url: url.into(),
            tls: None,
            state: WorkspaceClusterState::Available,
            score: 0,
            max_score: 0,
            govern: false,
            admission_constraints: Vec::new(),
        }
    }

    /// Reject records that must never reach the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "workspace cluster name must not be empty".to_string(),
            ));
        }
        if self.application_cluster.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "application cluster must not be empty".to_string(),
            ));
        }
        // Keys are matched exactly on lookup, so padding would hide the scope.
        for key in [&self.name, &self.application_cluster] {
            if key.trim() != key.as_str() {
                return Err(RegistryError::InvalidInput(format!(
                    "'{}' must not have leading or trailing whitespace",
                    key
                )));
            }
        }
        if self.url.trim().is_empty() {
            return Err(RegistryError::InvalidInput(format!(
                "url of workspace cluster {} must not be empty",
                self.name
            )));
        }
        for constraint in &self.admission_constraints {
            if let AdmissionConstraint::HasPermission { permission } = constraint {
                if permission.trim().is_empty() {
                    return Err(RegistryError::InvalidInput(
                        "has-permission constraint requires a permission".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// CA certificate, opaque to the registry.
    pub ca: String,
    /// Client certificate, opaque to the registry.
    pub crt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum WorkspaceClusterState {
    Available,
    Cordoned,
    Draining,
}

impl WorkspaceClusterState {
    pub const ALL: [WorkspaceClusterState; 3] = [Self::Available, Self::Cordoned, Self::Draining];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Cordoned => "cordoned",
            Self::Draining => "draining",
        }
    }

    /// Only available clusters accept new workspaces.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for WorkspaceClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkspaceClusterState {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s.trim())
            .ok_or_else(|| {
                RegistryError::InvalidInput(format!(
                    "unknown workspace cluster state '{}', expected one of: available, cordoned, draining",
                    s
                ))
            })
    }
}

/// Requirement a workspace has to meet before it may be placed on a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AdmissionConstraint {
    HasFeaturePreview,
    HasPermission { permission: String },
}

impl fmt::Display for AdmissionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasFeaturePreview => f.write_str("has-feature-preview"),
            Self::HasPermission { permission } => write!(f, "has-permission={}", permission),
        }
    }
}

impl FromStr for AdmissionConstraint {
    type Err = RegistryError;

    /// Parses `has-feature-preview` or `has-permission=<permission>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('=') {
            None if s.trim() == "has-feature-preview" => Ok(Self::HasFeaturePreview),
            Some(("has-permission", permission)) if !permission.trim().is_empty() => {
                Ok(Self::HasPermission {
                    permission: permission.trim().to_string(),
                })
            }
            _ => Err(RegistryError::InvalidInput(format!(
                "unknown admission constraint '{}', expected has-feature-preview or has-permission=<permission>",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_str() {
        for state in WorkspaceClusterState::ALL {
            assert_eq!(state.as_str().parse::<WorkspaceClusterState>().unwrap(), state);
        }
    }

    #[test]
    fn test_unknown_state_is_invalid_input() {
        let err = "maintenance".parse::<WorkspaceClusterState>().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
    }

    #[test]
    fn test_only_available_is_schedulable() {
        assert!(WorkspaceClusterState::Available.is_schedulable());
        assert!(!WorkspaceClusterState::Cordoned.is_schedulable());
        assert!(!WorkspaceClusterState::Draining.is_schedulable());
    }

    #[test]
    fn test_validate_rejects_empty_key_fields() {
        let cluster = WorkspaceCluster::new("", "eu02", "some-url");
        assert!(matches!(
            cluster.validate(),
            Err(RegistryError::InvalidInput(_))
        ));

        let cluster = WorkspaceCluster::new("eu71", "  ", "some-url");
        assert!(matches!(
            cluster.validate(),
            Err(RegistryError::InvalidInput(_))
        ));

        let cluster = WorkspaceCluster::new("eu71", "eu02", "");
        assert!(matches!(
            cluster.validate(),
            Err(RegistryError::InvalidInput(_))
        ));

        assert!(WorkspaceCluster::new("eu71", "eu02", "some-url")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_padded_key_fields() {
        let cluster = WorkspaceCluster::new(" eu71", "eu02", "some-url");
        assert!(matches!(
            cluster.validate(),
            Err(RegistryError::InvalidInput(_))
        ));

        let cluster = WorkspaceCluster::new("eu71", "eu02\t", "some-url");
        assert!(matches!(
            cluster.validate(),
            Err(RegistryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_permission() {
        let mut cluster = WorkspaceCluster::new("eu71", "eu02", "some-url");
        cluster.admission_constraints = vec![AdmissionConstraint::HasPermission {
            permission: String::new(),
        }];
        assert!(cluster.validate().is_err());
    }

    #[test]
    fn test_parse_admission_constraints() {
        assert_eq!(
            "has-feature-preview".parse::<AdmissionConstraint>().unwrap(),
            AdmissionConstraint::HasFeaturePreview
        );
        assert_eq!(
            "has-permission=admin-users"
                .parse::<AdmissionConstraint>()
                .unwrap(),
            AdmissionConstraint::HasPermission {
                permission: "admin-users".to_string()
            }
        );
        assert!("has-permission=".parse::<AdmissionConstraint>().is_err());
        assert!("has-region".parse::<AdmissionConstraint>().is_err());
    }

    #[test]
    fn test_admission_constraint_json_shape() {
        let json = serde_json::to_value(vec![
            AdmissionConstraint::HasFeaturePreview,
            AdmissionConstraint::HasPermission {
                permission: "monitor".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                { "type": "has-feature-preview" },
                { "type": "has-permission", "permission": "monitor" }
            ])
        );
    }

    #[test]
    fn test_cluster_serializes_camel_case() {
        let cluster = WorkspaceCluster::new("eu71", "eu02", "some-url");
        let json = serde_json::to_value(&cluster).unwrap();

        assert_eq!(json["applicationCluster"], "eu02");
        assert_eq!(json["maxScore"], 0);
        assert_eq!(json["state"], "available");
        assert!(json.get("tls").is_none());
    }
}
