//! Repository for the control-schema `tenants` registry.

use sqlx::PgPool;
use upwatch_core::tenant::CONTROL_SCHEMA;

use crate::models::tenant::{CreateTenant, Tenant};

/// Column list for `tenants` queries.
const COLUMNS: &str = "id, schema_name, display_name, is_active, created_at";

/// The tenant directory.
pub struct TenantRepo;

impl TenantRepo {
    /// Register a new tenant in the directory.
    ///
    /// Schema provisioning is a separate step (see
    /// [`crate::provisioning`]); until it completes the scheduler skips
    /// this tenant via the readiness gate.
    pub async fn create(pool: &PgPool, input: &CreateTenant) -> Result<Tenant, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (schema_name, display_name) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(&input.schema_name)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// List all active tenant partitions, control schema excluded.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Tenant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tenants \
             WHERE is_active AND schema_name <> $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(CONTROL_SCHEMA)
            .fetch_all(pool)
            .await
    }
}
