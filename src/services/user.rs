//! User management service
//!
//! Account provisioning and profile management. Accounts are created by
//! administrators; login never creates accounts.

use crate::database::DatabaseService;
use crate::models::user::{
    CreateUserRequest, UpdateUserRequest, User, UserRole, UserWithProfile,
};
use crate::utils::errors::{Result, SixkulError};
use crate::utils::helpers;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct UserService {
    db: DatabaseService,
}

impl UserService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Provision a new account with its role-specific profile
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserWithProfile> {
        self.validate_create(&request)?;

        if self.db.users.find_by_email(&request.email).await?.is_some() {
            return Err(SixkulError::InvalidInput(format!(
                "email {} is already registered",
                request.email
            )));
        }
        if self
            .db
            .users
            .find_by_external_id(&request.external_id)
            .await?
            .is_some()
        {
            return Err(SixkulError::InvalidInput(
                "external identity is already linked to an account".to_string(),
            ));
        }

        let user = self
            .db
            .users
            .create(
                &request.external_id,
                &request.email,
                &request.full_name,
                request.role,
            )
            .await?;

        let mut result = UserWithProfile {
            user,
            student_profile: None,
            pembina_profile: None,
        };

        match request.role {
            UserRole::Siswa => {
                let nis = request.nis.as_deref().unwrap_or_default();
                let class_name = request.class_name.as_deref().unwrap_or_default();
                let profile = self
                    .db
                    .users
                    .upsert_student_profile(
                        result.user.id,
                        nis,
                        class_name,
                        request.guardian_phone.as_deref(),
                    )
                    .await?;
                result.student_profile = Some(profile);
            }
            UserRole::Pembina => {
                let nip = request.nip.as_deref().unwrap_or_default();
                let profile = self
                    .db
                    .users
                    .upsert_pembina_profile(result.user.id, nip, request.phone.as_deref())
                    .await?;
                result.pembina_profile = Some(profile);
            }
            UserRole::Admin => {}
        }

        info!(user_id = result.user.id, "User account provisioned");
        Ok(result)
    }

    /// Update account fields and the role-specific profile
    pub async fn update_user(&self, id: i64, request: UpdateUserRequest) -> Result<UserWithProfile> {
        let existing = self
            .db
            .users
            .find_by_id(id)
            .await?
            .ok_or(SixkulError::UserNotFound { user_id: id })?;
        if existing.is_deleted() {
            return Err(SixkulError::UserNotFound { user_id: id });
        }

        if let Some(email) = &request.email {
            if !helpers::is_valid_email(email) {
                return Err(SixkulError::InvalidInput(format!("invalid email: {email}")));
            }
        }
        if let Some(nis) = &request.nis {
            if !helpers::is_valid_nis(nis) {
                return Err(SixkulError::InvalidInput(format!("invalid NIS: {nis}")));
            }
        }
        if let Some(nip) = &request.nip {
            if !helpers::is_valid_nip(nip) {
                return Err(SixkulError::InvalidInput(format!("invalid NIP: {nip}")));
            }
        }

        let user = self.db.users.update(id, &request).await?;

        if let Some(nis) = &request.nis {
            let class_name = match &request.class_name {
                Some(c) => c.clone(),
                None => self
                    .db
                    .users
                    .find_student_profile(id)
                    .await?
                    .map(|p| p.class_name)
                    .unwrap_or_default(),
            };
            self.db
                .users
                .upsert_student_profile(id, nis, &class_name, request.guardian_phone.as_deref())
                .await?;
        }
        if let Some(nip) = &request.nip {
            self.db
                .users
                .upsert_pembina_profile(id, nip, request.phone.as_deref())
                .await?;
        }

        self.with_profile(user).await
    }

    /// Fetch a user together with its profile
    pub async fn get_user(&self, id: i64) -> Result<UserWithProfile> {
        let user = self
            .db
            .users
            .find_by_id(id)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or(SixkulError::UserNotFound { user_id: id })?;

        self.with_profile(user).await
    }

    /// List users with pagination
    pub async fn list_users(
        &self,
        role: Option<UserRole>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        self.db.users.list(role, limit, offset).await
    }

    /// Deactivate an account. Enrollment and attendance history is kept.
    pub async fn deactivate_user(&self, id: i64) -> Result<()> {
        let user = self
            .db
            .users
            .find_by_id(id)
            .await?
            .ok_or(SixkulError::UserNotFound { user_id: id })?;
        if user.is_deleted() {
            return Err(SixkulError::UserNotFound { user_id: id });
        }

        self.db.users.soft_delete(id).await?;
        info!(user_id = id, "User account deactivated");
        Ok(())
    }

    /// Resolve the local account for a verified identity. Login does not
    /// create accounts, so an unknown identity is an authentication failure.
    pub async fn resolve_verified_identity(
        &self,
        external_id: &str,
        email: &str,
    ) -> Result<User> {
        let user = match self.db.users.find_by_external_id(external_id).await? {
            Some(user) => Some(user),
            None => self.db.users.find_by_email(email).await?,
        };

        let user = user
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| {
                SixkulError::Unauthenticated(
                    "no active account exists for this identity".to_string(),
                )
            })?;

        Ok(user)
    }

    async fn with_profile(&self, user: User) -> Result<UserWithProfile> {
        let student_profile = match user.role() {
            UserRole::Siswa => self.db.users.find_student_profile(user.id).await?,
            _ => None,
        };
        let pembina_profile = match user.role() {
            UserRole::Pembina => self.db.users.find_pembina_profile(user.id).await?,
            _ => None,
        };

        Ok(UserWithProfile {
            user,
            student_profile,
            pembina_profile,
        })
    }

    fn validate_create(&self, request: &CreateUserRequest) -> Result<()> {
        if !helpers::is_valid_email(&request.email) {
            return Err(SixkulError::InvalidInput(format!(
                "invalid email: {}",
                request.email
            )));
        }
        if request.full_name.trim().is_empty() {
            return Err(SixkulError::InvalidInput("full name is required".to_string()));
        }
        if request.external_id.trim().is_empty() {
            return Err(SixkulError::InvalidInput(
                "external identity is required".to_string(),
            ));
        }

        match request.role {
            UserRole::Siswa => {
                let nis = request
                    .nis
                    .as_deref()
                    .ok_or_else(|| SixkulError::InvalidInput("NIS is required for students".to_string()))?;
                if !helpers::is_valid_nis(nis) {
                    return Err(SixkulError::InvalidInput(format!("invalid NIS: {nis}")));
                }
                if request.class_name.as_deref().unwrap_or("").trim().is_empty() {
                    return Err(SixkulError::InvalidInput(
                        "class name is required for students".to_string(),
                    ));
                }
            }
            UserRole::Pembina => {
                let nip = request
                    .nip
                    .as_deref()
                    .ok_or_else(|| SixkulError::InvalidInput("NIP is required for pembina".to_string()))?;
                if !helpers::is_valid_nip(nip) {
                    return Err(SixkulError::InvalidInput(format!("invalid NIP: {nip}")));
                }
            }
            UserRole::Admin => {}
        }

        if let Some(phone) = request.guardian_phone.as_deref().or(request.phone.as_deref()) {
            if !helpers::is_valid_phone(phone) {
                return Err(SixkulError::InvalidInput(format!("invalid phone: {phone}")));
            }
        }

        Ok(())
    }
}
