//! Role-permission relation repository.

use async_trait::async_trait;
use sqlx::PgPool;

use repairdesk_core::error::{AppError, ErrorKind};
use repairdesk_core::result::AppResult;
use repairdesk_entity::permission::Action;
use repairdesk_entity::user::UserRole;

use crate::store::RolePermissionStore;

/// Repository for the `role_permissions` table.
#[derive(Debug, Clone)]
pub struct RolePermissionRepository {
    pool: PgPool,
}

impl RolePermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RolePermissionStore for RolePermissionRepository {
    async fn find_actions_for_role(&self, role: UserRole) -> AppResult<Vec<Action>> {
        sqlx::query_scalar::<_, Action>("SELECT action FROM role_permissions WHERE role = $1")
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load role permissions", e)
            })
    }

    async fn grant(&self, role: UserRole, action: Action) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_permissions (role, action) VALUES ($1, $2) \
             ON CONFLICT (role, action) DO NOTHING",
        )
        .bind(role)
        .bind(action)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to grant permission", e))?;
        Ok(())
    }
}
