//! Tenant registry entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upwatch_core::types::{DbId, Timestamp};

/// A row from the control-schema `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub schema_name: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for registering a new tenant.
#[derive(Debug, Deserialize)]
pub struct CreateTenant {
    pub schema_name: String,
    pub display_name: String,
}
