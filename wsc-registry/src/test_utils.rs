use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Helper to create an in-memory test database with migrations applied
///
/// The pool holds a single connection that never expires, so every query sees
/// the same in-memory database.
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    crate::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
