//! Notification service implementation
//!
//! This service renders notification templates with multi-language support
//! and delivers them as in-app notification rows. Delivery respects the
//! recipient's stored preferences.

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::models::notification::{CreateNotificationRequest, Notification};
use crate::utils::errors::{Result, SixkulError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Notification categories, used for preference gating
pub mod kinds {
    pub const ENROLLMENT: &str = "ENROLLMENT";
    pub const ANNOUNCEMENT: &str = "ANNOUNCEMENT";
    pub const SESSION: &str = "SESSION";
}

/// Message template structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub key: String,
    pub kind: String,
    /// language -> (title, body)
    pub content: HashMap<String, (String, String)>,
}

/// Notification delivery statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_delivered: u64,
    pub total_suppressed: u64,
    pub delivered_by_template: HashMap<String, u64>,
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    db: DatabaseService,
    settings: Settings,
    templates: HashMap<String, MessageTemplate>,
    stats: Arc<Mutex<NotificationStats>>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: DatabaseService, settings: Settings) -> Self {
        let templates = Self::load_default_templates();

        Self {
            db,
            settings,
            templates,
            stats: Arc::new(Mutex::new(NotificationStats::default())),
        }
    }

    /// Render a template and store a notification for one user.
    ///
    /// Returns None when the user's preferences suppress this kind.
    pub async fn notify(
        &self,
        user_id: i64,
        template_key: &str,
        parameters: &HashMap<String, String>,
        reference_id: Option<i64>,
    ) -> Result<Option<Notification>> {
        let template = self.templates.get(template_key).ok_or_else(|| {
            SixkulError::InvalidInput(format!("template not found: {template_key}"))
        })?;

        let prefs = self.db.preferences.find_by_user(user_id).await?;
        let (enabled, language) = match &prefs {
            Some(p) => {
                let enabled = match template.kind.as_str() {
                    kinds::ENROLLMENT => p.notify_enrollment,
                    kinds::ANNOUNCEMENT => p.notify_announcements,
                    kinds::SESSION => p.notify_session_reminders,
                    _ => true,
                };
                (enabled, p.language.clone())
            }
            None => (true, self.settings.notifications.default_language.clone()),
        };

        if !enabled {
            debug!(user_id = user_id, template_key = template_key, "Notification suppressed by preferences");
            self.stats.lock().expect("stats lock").total_suppressed += 1;
            return Ok(None);
        }

        let (title, body) = self.format_message(template, &language, parameters)?;

        let notification = self
            .db
            .notifications
            .create(&CreateNotificationRequest {
                user_id,
                kind: template.kind.clone(),
                title,
                body,
                reference_id,
            })
            .await?;

        {
            let mut stats = self.stats.lock().expect("stats lock");
            stats.total_delivered += 1;
            *stats
                .delivered_by_template
                .entry(template_key.to_string())
                .or_insert(0) += 1;
        }

        info!(user_id = user_id, template_key = template_key, "Notification delivered");
        Ok(Some(notification))
    }

    /// Notify many users with the same template
    pub async fn notify_many(
        &self,
        user_ids: &[i64],
        template_key: &str,
        parameters: &HashMap<String, String>,
        reference_id: Option<i64>,
    ) -> Result<u64> {
        let mut delivered = 0;
        for &user_id in user_ids {
            match self.notify(user_id, template_key, parameters, reference_id).await {
                Ok(Some(_)) => delivered += 1,
                Ok(None) => {}
                Err(e) => {
                    // One failed recipient must not stop the rest.
                    warn!(user_id = user_id, error = %e, "Failed to deliver notification");
                }
            }
        }

        info!(
            total = user_ids.len(),
            delivered = delivered,
            template_key = template_key,
            "Bulk notification completed"
        );
        Ok(delivered)
    }

    /// Get delivery statistics
    pub fn get_stats(&self) -> NotificationStats {
        self.stats.lock().expect("stats lock").clone()
    }

    /// Render a template's title and body
    fn format_message(
        &self,
        template: &MessageTemplate,
        language: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<(String, String)> {
        let content = template
            .content
            .get(language)
            .or_else(|| {
                template
                    .content
                    .get(&self.settings.notifications.default_language)
            })
            .ok_or_else(|| {
                SixkulError::InvalidInput(format!(
                    "template {} has no content for language {language}",
                    template.key
                ))
            })?;

        let mut title = content.0.clone();
        let mut body = content.1.clone();
        for (key, value) in parameters {
            let placeholder = format!("{{{}}}", key);
            title = title.replace(&placeholder, value);
            body = body.replace(&placeholder, value);
        }

        Ok((title, body))
    }

    /// Load default message templates
    fn load_default_templates() -> HashMap<String, MessageTemplate> {
        let mut templates = HashMap::new();

        let mut add = |key: &str, kind: &str, id: (&str, &str), en: (&str, &str)| {
            let mut content = HashMap::new();
            content.insert("id".to_string(), (id.0.to_string(), id.1.to_string()));
            content.insert("en".to_string(), (en.0.to_string(), en.1.to_string()));
            templates.insert(
                key.to_string(),
                MessageTemplate {
                    key: key.to_string(),
                    kind: kind.to_string(),
                    content,
                },
            );
        };

        add(
            "enrollment_applied",
            kinds::ENROLLMENT,
            (
                "Pendaftaran baru",
                "{student_name} mendaftar ke ekskul {extracurricular_name}.",
            ),
            (
                "New application",
                "{student_name} applied to join {extracurricular_name}.",
            ),
        );
        add(
            "enrollment_approved",
            kinds::ENROLLMENT,
            (
                "Pendaftaran diterima",
                "Pendaftaran kamu ke ekskul {extracurricular_name} telah diterima.",
            ),
            (
                "Application approved",
                "Your application to {extracurricular_name} has been approved.",
            ),
        );
        add(
            "enrollment_rejected",
            kinds::ENROLLMENT,
            (
                "Pendaftaran ditolak",
                "Pendaftaran kamu ke ekskul {extracurricular_name} ditolak. {note}",
            ),
            (
                "Application rejected",
                "Your application to {extracurricular_name} was rejected. {note}",
            ),
        );
        add(
            "announcement_published",
            kinds::ANNOUNCEMENT,
            ("Pengumuman: {title}", "{body}"),
            ("Announcement: {title}", "{body}"),
        );
        add(
            "session_cancelled",
            kinds::SESSION,
            (
                "Sesi dibatalkan",
                "Sesi {extracurricular_name} pada {session_date} dibatalkan.",
            ),
            (
                "Session cancelled",
                "The {extracurricular_name} session on {session_date} has been cancelled.",
            ),
        );

        templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_cover_both_languages() {
        let templates = NotificationService::load_default_templates();
        for template in templates.values() {
            assert!(template.content.contains_key("id"), "{} missing id", template.key);
            assert!(template.content.contains_key("en"), "{} missing en", template.key);
        }
    }

    #[test]
    fn test_parameter_substitution() {
        let templates = NotificationService::load_default_templates();
        let template = templates.get("enrollment_approved").unwrap();
        let (_, body) = template.content.get("en").unwrap();

        let mut rendered = body.clone();
        rendered = rendered.replace("{extracurricular_name}", "Robotik");

        assert!(rendered.contains("Robotik"));
        assert!(!rendered.contains("{extracurricular_name}"));
    }
}
