use sqlx::error::ErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

// Primary SQLite result codes, masked from the extended code.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CONSTRAINT: i32 = 19;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Workspace cluster not found: {name} (application cluster {application_cluster})")]
    NotFound {
        name: String,
        application_cluster: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(#[source] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    pub fn not_found(name: &str, application_cluster: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
            application_cluster: application_cluster.to_string(),
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let primary_code = db_err
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| code & 0xff);

                match (db_err.kind(), primary_code) {
                    (
                        ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::CheckViolation,
                        _,
                    )
                    | (_, Some(SQLITE_CONSTRAINT)) => Self::ConstraintViolation(err),
                    (_, Some(SQLITE_BUSY | SQLITE_LOCKED)) => Self::StorageUnavailable(err),
                    _ => Self::Database(err),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::WorkerCrashed => Self::StorageUnavailable(err),
            _ => Self::Database(err),
        }
    }
}
