//! Extracurricular management service

use crate::database::DatabaseService;
use crate::models::extracurricular::{
    CreateExtracurricularRequest, Extracurricular, UpdateExtracurricularRequest,
};
use crate::models::user::UserRole;
use crate::services::auth::{AuthContext, Permission};
use crate::utils::errors::{Result, SixkulError};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExtracurricularService {
    db: DatabaseService,
}

impl ExtracurricularService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Create a new extracurricular
    pub async fn create(&self, request: CreateExtracurricularRequest) -> Result<Extracurricular> {
        if request.name.trim().is_empty() {
            return Err(SixkulError::InvalidInput("name is required".to_string()));
        }
        if let Some(capacity) = request.capacity {
            if capacity <= 0 {
                return Err(SixkulError::InvalidInput(
                    "capacity must be greater than 0".to_string(),
                ));
            }
        }
        if let Some(pembina_id) = request.pembina_id {
            self.assert_is_pembina(pembina_id).await?;
        }

        let ekskul = self.db.extracurriculars.create(&request).await?;
        info!(extracurricular_id = ekskul.id, name = %ekskul.name, "Extracurricular created");
        Ok(ekskul)
    }

    /// Fetch one extracurricular
    pub async fn get(&self, id: i64) -> Result<Extracurricular> {
        self.db
            .extracurriculars
            .find_by_id(id)
            .await?
            .ok_or(SixkulError::ExtracurricularNotFound { id })
    }

    /// Update an extracurricular
    pub async fn update(
        &self,
        id: i64,
        request: UpdateExtracurricularRequest,
    ) -> Result<Extracurricular> {
        self.get(id).await?;

        if let Some(capacity) = request.capacity {
            if capacity <= 0 {
                return Err(SixkulError::InvalidInput(
                    "capacity must be greater than 0".to_string(),
                ));
            }
            // Shrinking below the current active membership is not allowed.
            let active = self.db.enrollments.count_active(id).await?;
            if (capacity as i64) < active {
                return Err(SixkulError::InvalidInput(format!(
                    "capacity {capacity} is below the current active membership of {active}"
                )));
            }
        }
        if let Some(pembina_id) = request.pembina_id {
            self.assert_is_pembina(pembina_id).await?;
        }

        let ekskul = self.db.extracurriculars.update(id, &request).await?;
        info!(extracurricular_id = id, "Extracurricular updated");
        Ok(ekskul)
    }

    /// Soft delete an extracurricular
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;
        self.db.extracurriculars.soft_delete(id).await?;
        info!(extracurricular_id = id, "Extracurricular deleted");
        Ok(())
    }

    /// List extracurriculars
    pub async fn list(
        &self,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Extracurricular>> {
        self.db.extracurriculars.list(category, limit, offset).await
    }

    /// List extracurriculars supervised by a pembina
    pub async fn list_by_pembina(&self, pembina_id: i64) -> Result<Vec<Extracurricular>> {
        self.db.extracurriculars.list_by_pembina(pembina_id).await
    }

    /// Check that the caller may manage this extracurricular. Admins manage
    /// everything; a pembina only the activities assigned to them.
    pub async fn assert_can_manage(&self, ctx: &AuthContext, id: i64) -> Result<Extracurricular> {
        let ekskul = self.get(id).await?;

        if ctx.permission == Permission::Admin {
            return Ok(ekskul);
        }
        if ctx.permission == Permission::Pembina && ekskul.pembina_id == Some(ctx.user_id()) {
            return Ok(ekskul);
        }

        Err(SixkulError::PermissionDenied(
            "only the assigned pembina or an admin may manage this extracurricular".to_string(),
        ))
    }

    async fn assert_is_pembina(&self, user_id: i64) -> Result<()> {
        let user = self
            .db
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or(SixkulError::UserNotFound { user_id })?;

        if user.role() != UserRole::Pembina {
            return Err(SixkulError::InvalidInput(format!(
                "user {user_id} does not hold the pembina role"
            )));
        }

        Ok(())
    }
}
