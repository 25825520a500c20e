// CLI argument parsing and definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wsc_registry::{AdmissionConstraint, WorkspaceClusterState};

#[derive(Debug, Clone, Parser)]
#[command(name = "wscctl")]
#[command(about = "Manage the workspace clusters visible to application clusters")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the registry database (overrides configuration)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Application cluster whose view to operate on (overrides configuration)
    #[arg(short, long, global = true)]
    pub application_cluster: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List workspace clusters
    List {
        /// Only the workspace cluster with this name
        #[arg(long)]
        name: Option<String>,
        /// Only clusters in this state (available, cordoned, draining)
        #[arg(long)]
        state: Option<WorkspaceClusterState>,
        /// Only clusters whose govern flag matches
        #[arg(long)]
        govern: Option<bool>,
        /// Only clusters with at least this score
        #[arg(long)]
        min_score: Option<u32>,
        /// Ignore the application cluster and list every scope
        #[arg(long)]
        all_scopes: bool,
    },
    /// Show one workspace cluster
    Get {
        /// Workspace cluster name
        name: String,
    },
    /// Register a workspace cluster, replacing any existing registration
    Register {
        /// Workspace cluster name
        name: String,
        /// Endpoint of the workspace cluster
        #[arg(long)]
        url: String,
        /// CA certificate used to reach the cluster
        #[arg(long, requires = "tls_crt")]
        tls_ca: Option<String>,
        /// Client certificate used to reach the cluster
        #[arg(long, requires = "tls_ca")]
        tls_crt: Option<String>,
        /// Initial state
        #[arg(long, default_value = "available")]
        state: WorkspaceClusterState,
        /// Scheduling score
        #[arg(long, default_value_t = 100)]
        score: u32,
        /// Upper bound for the score
        #[arg(long, default_value_t = 100)]
        max_score: u32,
        /// This application cluster governs the workspace cluster
        #[arg(long)]
        govern: bool,
        /// has-feature-preview or has-permission=<permission> (repeatable)
        #[arg(long = "admission-constraint")]
        admission_constraints: Vec<AdmissionConstraint>,
    },
    /// Stop scheduling onto an available workspace cluster
    Cordon {
        /// Workspace cluster name
        name: String,
    },
    /// Resume scheduling onto a cordoned workspace cluster
    Uncordon {
        /// Workspace cluster name
        name: String,
    },
    /// Mark a workspace cluster as draining
    Drain {
        /// Workspace cluster name
        name: String,
    },
    /// Update a single field of a registered workspace cluster
    Update {
        #[command(subcommand)]
        field: UpdateSubcommand,
    },
    /// Remove a workspace cluster from this application cluster's view
    Deregister {
        /// Workspace cluster name
        name: String,
    },
    /// Back up the database and apply pending migrations
    Migrate,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UpdateSubcommand {
    /// Set the scheduling score
    Score {
        /// Workspace cluster name
        name: String,
        value: u32,
    },
    /// Set the score upper bound
    MaxScore {
        /// Workspace cluster name
        name: String,
        value: u32,
    },
    /// Set whether this application cluster governs the workspace cluster
    Govern {
        /// Workspace cluster name
        name: String,
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_register_with_all_options() {
        let args = Args::try_parse_from([
            "wscctl",
            "-a",
            "eu02",
            "register",
            "eu71",
            "--url",
            "https://ws-eu71.example.com",
            "--tls-ca",
            "ca",
            "--tls-crt",
            "crt",
            "--state",
            "cordoned",
            "--score",
            "50",
            "--govern",
            "--admission-constraint",
            "has-feature-preview",
            "--admission-constraint",
            "has-permission=monitor",
        ])
        .unwrap();

        assert_eq!(args.application_cluster.as_deref(), Some("eu02"));
        match args.command {
            Command::Register {
                name,
                state,
                score,
                max_score,
                govern,
                admission_constraints,
                ..
            } => {
                assert_eq!(name, "eu71");
                assert_eq!(state, WorkspaceClusterState::Cordoned);
                assert_eq!(score, 50);
                assert_eq!(max_score, 100);
                assert!(govern);
                assert_eq!(admission_constraints.len(), 2);
            }
            other => panic!("Expected register, got {:?}", other),
        }
    }

    #[test]
    fn test_tls_flags_must_come_together() {
        let result = Args::try_parse_from([
            "wscctl", "register", "eu71", "--url", "u", "--tls-ca", "ca",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_unknown_state() {
        let result = Args::try_parse_from(["wscctl", "list", "--state", "paused"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_update_govern_value() {
        let args = Args::try_parse_from(["wscctl", "update", "govern", "eu71", "false"]).unwrap();
        match args.command {
            Command::Update {
                field: UpdateSubcommand::Govern { name, value },
            } => {
                assert_eq!(name, "eu71");
                assert!(!value);
            }
            other => panic!("Expected update govern, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["wscctl", "list", "--all-scopes", "--output", "json"]).unwrap();
        assert_eq!(args.output, OutputFormat::Json);
        assert!(matches!(
            args.command,
            Command::List {
                all_scopes: true,
                ..
            }
        ));
    }
}
