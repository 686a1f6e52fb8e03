//! Embedded `PostgreSQL` lifecycle for repository integration tests.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use postgresql_embedded::PostgreSQL;
use uuid::Uuid;

/// SQL applied to every fresh test database.
const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-06-20-000000_create_core_tables/up.sql");

/// A running embedded server plus a pooled connection to a fresh
/// database. Dropping the harness stops the server.
pub struct EmbeddedDb {
    // Held for its Drop; the server stops when this goes away.
    _postgresql: PostgreSQL,
    /// Pool over the per-test database.
    pub pool: Pool<ConnectionManager<PgConnection>>,
}

/// Boots an embedded server, creates a uniquely named database, and
/// applies the migrations.
///
/// # Errors
///
/// Returns an error when the server fails to set up or start, or when
/// migrations fail to apply.
pub async fn embedded_db() -> eyre::Result<EmbeddedDb> {
    let mut postgresql = PostgreSQL::default();
    postgresql.setup().await?;
    postgresql.start().await?;

    let database_name = format!("fieldline_{}", Uuid::new_v4().simple());
    postgresql.create_database(&database_name).await?;
    let url = postgresql.settings().url(&database_name);

    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder().max_size(2).build(manager)?;

    let mut connection = pool.get()?;
    connection.batch_execute(CREATE_SCHEMA_SQL)?;
    drop(connection);

    Ok(EmbeddedDb {
        _postgresql: postgresql,
        pool,
    })
}
