//! Shared helpers for the `PostgreSQL` farm store tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use super::cluster::{ManagedCluster, TemporaryDatabase};
use aquaroute::store::adapters::postgres::{FarmPgPool, PostgresFarmStore};
use aquaroute::transfer::services::TransferPlanService;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// SQL creating every farm table.
pub const CREATE_FARM_TABLES_SQL: &str =
    include_str!("../../migrations/2026-01-01-000000_create_farm_tables/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "aquaroute_test_template";

/// Set to make an unavailable cluster fail the suite instead of skipping it.
pub const REQUIRE_POSTGRES_ENV: &str = "AQUAROUTE_REQUIRE_POSTGRES";

/// Transfer service wired to the `PostgreSQL` store.
pub type PgTransferService =
    TransferPlanService<PostgresFarmStore, PostgresFarmStore, PostgresFarmStore, DefaultClock>;

/// A store over a private database cloned from the template.
///
/// Fields drop in order, so the pool closes before its database is dropped.
pub struct PreparedStore {
    pub store: Arc<PostgresFarmStore>,
    pub database: TemporaryDatabase,
}

impl PreparedStore {
    /// Builds a transfer service over this store.
    #[must_use]
    pub fn transfer_service(&self) -> PgTransferService {
        TransferPlanService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::new(DefaultClock),
        )
    }

    /// Opens a direct connection for assertions the ports do not expose.
    pub fn connect(&self) -> Result<PgConnection, BoxError> {
        PgConnection::establish(self.database.url()).map_err(|err| Box::new(err) as BoxError)
    }
}

/// Ensures the template database exists with the schema applied.
pub fn ensure_template(cluster: &ManagedCluster) -> Result<(), BoxError> {
    cluster.ensure_template_exists(TEMPLATE_DB, apply_migrations)
}

fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_FARM_TABLES_SQL)
        .map_err(|err| Box::new(err) as BoxError)
}

fn setup_store(cluster: PostgresCluster) -> Result<PreparedStore, BoxError> {
    ensure_template(cluster)?;
    let database = cluster
        .temporary_database_from_template(&format!("farm_{}", Uuid::new_v4().simple()), TEMPLATE_DB)?;
    let manager = ConnectionManager::<PgConnection>::new(database.url());
    let pool: FarmPgPool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(PreparedStore {
        store: Arc::new(PostgresFarmStore::new(pool)),
        database,
    })
}

/// Prepares an isolated store, or `None` when no cluster is available.
///
/// # Errors
///
/// Returns an error when the cluster is up but the database cannot be
/// prepared, or when the cluster is down and [`REQUIRE_POSTGRES_ENV`] is set.
#[fixture]
pub async fn prepared_store(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<Option<PreparedStore>, BoxError> {
    let cluster = match postgres_cluster {
        Ok(cluster) => cluster,
        Err(err) if std::env::var_os(REQUIRE_POSTGRES_ENV).is_some() => return Err(err),
        Err(err) => {
            warn!(error = %err, "SKIP-TEST-CLUSTER: PostgreSQL unavailable");
            return Ok(None);
        }
    };
    tokio::task::spawn_blocking(move || setup_store(cluster))
        .await
        .map_err(|err| Box::new(err) as BoxError)?
        .map(Some)
}

/// Counts the rows of `table` in the prepared database.
pub fn count_rows(prepared: &PreparedStore, table: &str) -> Result<i64, BoxError> {
    #[derive(diesel::QueryableByName)]
    struct CountRow {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        total: i64,
    }

    let mut conn = prepared.connect()?;
    let row = diesel::sql_query(format!("SELECT COUNT(*) AS total FROM {table}"))
        .get_result::<CountRow>(&mut conn)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(row.total)
}
