//! Extracurricular repository implementation

use crate::models::extracurricular::{
    CreateExtracurricularRequest, Extracurricular, UpdateExtracurricularRequest,
};
use crate::utils::errors::SixkulError;
use chrono::Utc;
use sqlx::PgPool;

const EKSKUL_COLUMNS: &str = "id, name, description, category, pembina_id, capacity, is_open, deleted_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ExtracurricularRepository {
    pool: PgPool,
}

impl ExtracurricularRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new extracurricular
    pub async fn create(
        &self,
        request: &CreateExtracurricularRequest,
    ) -> Result<Extracurricular, SixkulError> {
        let ekskul = sqlx::query_as::<_, Extracurricular>(&format!(
            r#"
            INSERT INTO extracurriculars (name, description, category, pembina_id, capacity, is_open, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {EKSKUL_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(request.description.as_deref())
        .bind(request.category.as_deref())
        .bind(request.pembina_id)
        .bind(request.capacity.unwrap_or(30))
        .bind(request.is_open.unwrap_or(true))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(ekskul)
    }

    /// Find an extracurricular by ID, excluding soft-deleted rows
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Extracurricular>, SixkulError> {
        let ekskul = sqlx::query_as::<_, Extracurricular>(&format!(
            "SELECT {EKSKUL_COLUMNS} FROM extracurriculars WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ekskul)
    }

    /// Update an extracurricular
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateExtracurricularRequest,
    ) -> Result<Extracurricular, SixkulError> {
        let ekskul = sqlx::query_as::<_, Extracurricular>(&format!(
            r#"
            UPDATE extracurriculars
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                pembina_id = COALESCE($5, pembina_id),
                capacity = COALESCE($6, capacity),
                is_open = COALESCE($7, is_open),
                updated_at = $8
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {EKSKUL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.description.as_deref())
        .bind(request.category.as_deref())
        .bind(request.pembina_id)
        .bind(request.capacity)
        .bind(request.is_open)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(ekskul)
    }

    /// Soft delete an extracurricular
    pub async fn soft_delete(&self, id: i64) -> Result<(), SixkulError> {
        sqlx::query("UPDATE extracurriculars SET deleted_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List extracurriculars with pagination
    pub async fn list(
        &self,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Extracurricular>, SixkulError> {
        let list = sqlx::query_as::<_, Extracurricular>(&format!(
            r#"
            SELECT {EKSKUL_COLUMNS} FROM extracurriculars
            WHERE deleted_at IS NULL AND ($1::TEXT IS NULL OR category = $1)
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(category)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(list)
    }

    /// List extracurriculars supervised by a pembina
    pub async fn list_by_pembina(&self, pembina_id: i64) -> Result<Vec<Extracurricular>, SixkulError> {
        let list = sqlx::query_as::<_, Extracurricular>(&format!(
            "SELECT {EKSKUL_COLUMNS} FROM extracurriculars WHERE pembina_id = $1 AND deleted_at IS NULL ORDER BY name ASC"
        ))
        .bind(pembina_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(list)
    }

    /// Count non-deleted extracurriculars
    pub async fn count(&self) -> Result<i64, SixkulError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM extracurriculars WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
