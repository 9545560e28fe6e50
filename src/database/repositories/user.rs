//! User repository implementation

use crate::models::user::{PembinaProfile, StudentProfile, UpdateUserRequest, User, UserRole};
use crate::utils::errors::SixkulError;
use chrono::Utc;
use sqlx::PgPool;

const USER_COLUMNS: &str =
    "id, external_id, email, full_name, role, deleted_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user account
    pub async fn create(
        &self,
        external_id: &str,
        email: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User, SixkulError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (external_id, email, full_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(external_id)
        .bind(email)
        .bind(full_name)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, SixkulError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by the identity provider's subject identifier
    pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, SixkulError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, SixkulError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user account fields
    pub async fn update(&self, id: i64, request: &UpdateUserRequest) -> Result<User, SixkulError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                role = COALESCE($4, role),
                updated_at = $5
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.email.as_deref())
        .bind(request.full_name.as_deref())
        .bind(request.role.map(|r| r.as_str()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Soft delete a user account
    pub async fn soft_delete(&self, id: i64) -> Result<(), SixkulError> {
        sqlx::query("UPDATE users SET deleted_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List users with pagination, excluding soft-deleted accounts
    pub async fn list(
        &self,
        role: Option<UserRole>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, SixkulError> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE deleted_at IS NULL AND ($1::TEXT IS NULL OR role = $1)
            ORDER BY full_name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(role.map(|r| r.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count users by role, excluding soft-deleted accounts
    pub async fn count_by_role(&self, role: UserRole) -> Result<i64, SixkulError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1 AND deleted_at IS NULL")
                .bind(role.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Insert or update the student profile for a user
    pub async fn upsert_student_profile(
        &self,
        user_id: i64,
        nis: &str,
        class_name: &str,
        guardian_phone: Option<&str>,
    ) -> Result<StudentProfile, SixkulError> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            r#"
            INSERT INTO student_profiles (user_id, nis, class_name, guardian_phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET nis = EXCLUDED.nis,
                class_name = EXCLUDED.class_name,
                guardian_phone = COALESCE(EXCLUDED.guardian_phone, student_profiles.guardian_phone),
                updated_at = EXCLUDED.updated_at
            RETURNING id, user_id, nis, class_name, guardian_phone, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(nis)
        .bind(class_name)
        .bind(guardian_phone)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Insert or update the pembina profile for a user
    pub async fn upsert_pembina_profile(
        &self,
        user_id: i64,
        nip: &str,
        phone: Option<&str>,
    ) -> Result<PembinaProfile, SixkulError> {
        let profile = sqlx::query_as::<_, PembinaProfile>(
            r#"
            INSERT INTO pembina_profiles (user_id, nip, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET nip = EXCLUDED.nip,
                phone = COALESCE(EXCLUDED.phone, pembina_profiles.phone),
                updated_at = EXCLUDED.updated_at
            RETURNING id, user_id, nip, phone, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(nip)
        .bind(phone)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find the student profile for a user
    pub async fn find_student_profile(
        &self,
        user_id: i64,
    ) -> Result<Option<StudentProfile>, SixkulError> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            "SELECT id, user_id, nis, class_name, guardian_phone, created_at, updated_at FROM student_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find the pembina profile for a user
    pub async fn find_pembina_profile(
        &self,
        user_id: i64,
    ) -> Result<Option<PembinaProfile>, SixkulError> {
        let profile = sqlx::query_as::<_, PembinaProfile>(
            "SELECT id, user_id, nip, phone, created_at, updated_at FROM pembina_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
