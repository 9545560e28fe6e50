//! Announcement service

use crate::database::DatabaseService;
use crate::models::announcement::{
    Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::enrollment::EnrollmentStatus;
use crate::models::user::UserRole;
use crate::services::auth::{AuthContext, Permission};
use crate::services::extracurricular::ExtracurricularService;
use crate::services::notification::NotificationService;
use crate::utils::errors::{Result, SixkulError};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AnnouncementService {
    db: DatabaseService,
    extracurriculars: ExtracurricularService,
    notifications: NotificationService,
}

impl AnnouncementService {
    pub fn new(
        db: DatabaseService,
        extracurriculars: ExtracurricularService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            db,
            extracurriculars,
            notifications,
        }
    }

    /// Publish an announcement. Global announcements are admin-only; scoped
    /// ones require management rights over the extracurricular. Recipients
    /// get an in-app notification.
    pub async fn publish(
        &self,
        ctx: &AuthContext,
        request: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        if request.title.trim().is_empty() || request.body.trim().is_empty() {
            return Err(SixkulError::InvalidInput(
                "announcement title and body are required".to_string(),
            ));
        }

        match request.extracurricular_id {
            None => {
                if ctx.permission != Permission::Admin {
                    return Err(SixkulError::PermissionDenied(
                        "only admins may publish global announcements".to_string(),
                    ));
                }
            }
            Some(id) => {
                self.extracurriculars.assert_can_manage(ctx, id).await?;
            }
        }

        let announcement = self.db.announcements.create(&request, ctx.user_id()).await?;
        info!(
            announcement_id = announcement.id,
            created_by = ctx.user_id(),
            "Announcement published"
        );

        let recipients = match request.extracurricular_id {
            Some(id) => {
                let members = self
                    .db
                    .enrollments
                    .list_by_extracurricular(id, Some(EnrollmentStatus::Active))
                    .await?;
                members.iter().map(|e| e.student_id).collect::<Vec<_>>()
            }
            None => {
                let students = self
                    .db
                    .users
                    .list(Some(UserRole::Siswa), 10_000, 0)
                    .await?;
                students.iter().map(|u| u.id).collect::<Vec<_>>()
            }
        };

        let mut params = HashMap::new();
        params.insert("title".to_string(), announcement.title.clone());
        params.insert("body".to_string(), announcement.body.clone());
        if let Err(e) = self
            .notifications
            .notify_many(&recipients, "announcement_published", &params, Some(announcement.id))
            .await
        {
            warn!(error = %e, "Failed to fan out announcement notifications");
        }

        Ok(announcement)
    }

    /// Edit an announcement's text
    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i64,
        request: UpdateAnnouncementRequest,
    ) -> Result<Announcement> {
        let announcement = self.get(id).await?;
        self.assert_can_manage(ctx, &announcement).await?;

        self.db.announcements.update(id, &request).await
    }

    /// Retract an announcement
    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> Result<()> {
        let announcement = self.get(id).await?;
        self.assert_can_manage(ctx, &announcement).await?;

        self.db.announcements.soft_delete(id).await?;
        info!(announcement_id = id, "Announcement deleted");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Announcement> {
        self.db
            .announcements
            .find_by_id(id)
            .await?
            .ok_or(SixkulError::AnnouncementNotFound { id })
    }

    /// Announcements visible to the caller. Students always get their own
    /// visible set; staff may narrow to one extracurricular.
    pub async fn list_visible(
        &self,
        ctx: &AuthContext,
        extracurricular_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Announcement>> {
        match ctx.permission {
            Permission::Siswa => {
                self.db
                    .announcements
                    .list_visible_to_student(ctx.user_id(), limit, offset)
                    .await
            }
            _ => {
                self.db
                    .announcements
                    .list(extracurricular_id, limit, offset)
                    .await
            }
        }
    }

    async fn assert_can_manage(&self, ctx: &AuthContext, announcement: &Announcement) -> Result<()> {
        match announcement.extracurricular_id {
            None => {
                if ctx.permission != Permission::Admin {
                    return Err(SixkulError::PermissionDenied(
                        "only admins may manage global announcements".to_string(),
                    ));
                }
                Ok(())
            }
            Some(id) => {
                self.extracurriculars.assert_can_manage(ctx, id).await?;
                Ok(())
            }
        }
    }
}
