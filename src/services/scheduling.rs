//! Scheduling service
//!
//! Weekly schedule slots plus materialization of concrete sessions. A
//! generation request walks the requested date range and creates one session
//! per matching weekday, skipping dates that already have one.

use crate::database::DatabaseService;
use crate::models::schedule::{
    CreateScheduleRequest, CreateSessionRequest, Schedule, Session, SessionStatus,
    UpdateScheduleRequest, UpdateSessionRequest,
};
use crate::services::auth::AuthContext;
use crate::services::extracurricular::ExtracurricularService;
use crate::services::notification::NotificationService;
use crate::utils::errors::{Result, SixkulError};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;
use tracing::{info, warn};

/// Longest date range a single generation request may cover.
pub const MAX_GENERATION_DAYS: i64 = 92;

/// Dates in `[from, to]` falling on the given weekday (0 = Monday .. 6 = Sunday).
pub fn matching_dates(day_of_week: i16, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if from > to || !(0..=6).contains(&day_of_week) {
        return dates;
    }

    let offset = (day_of_week as i64 - from.weekday().num_days_from_monday() as i64).rem_euclid(7);
    let mut date = from + Duration::days(offset);
    while date <= to {
        dates.push(date);
        date += Duration::days(7);
    }

    dates
}

#[derive(Debug, Clone)]
pub struct SchedulingService {
    db: DatabaseService,
    extracurriculars: ExtracurricularService,
    notifications: NotificationService,
}

impl SchedulingService {
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

    /// Create a weekly schedule slot
    pub async fn create_schedule(
        &self,
        ctx: &AuthContext,
        request: CreateScheduleRequest,
    ) -> Result<Schedule> {
        self.extracurriculars
            .assert_can_manage(ctx, request.extracurricular_id)
            .await?;
        Self::validate_slot(request.day_of_week, request.start_time, request.end_time)?;

        let schedule = self.db.schedules.create(&request).await?;
        info!(schedule_id = schedule.id, "Schedule slot created");
        Ok(schedule)
    }

    /// Update a weekly schedule slot. Already materialized sessions keep
    /// their recorded time and place.
    pub async fn update_schedule(
        &self,
        ctx: &AuthContext,
        id: i64,
        request: UpdateScheduleRequest,
    ) -> Result<Schedule> {
        let schedule = self.get_schedule(id).await?;
        self.extracurriculars
            .assert_can_manage(ctx, schedule.extracurricular_id)
            .await?;

        let day = request.day_of_week.unwrap_or(schedule.day_of_week);
        let start = request.start_time.unwrap_or(schedule.start_time);
        let end = request.end_time.unwrap_or(schedule.end_time);
        Self::validate_slot(day, start, end)?;

        self.db.schedules.update(id, &request).await
    }

    /// Delete a weekly schedule slot
    pub async fn delete_schedule(&self, ctx: &AuthContext, id: i64) -> Result<()> {
        let schedule = self.get_schedule(id).await?;
        self.extracurriculars
            .assert_can_manage(ctx, schedule.extracurricular_id)
            .await?;

        self.db.schedules.delete(id).await?;
        info!(schedule_id = id, "Schedule slot deleted");
        Ok(())
    }

    pub async fn get_schedule(&self, id: i64) -> Result<Schedule> {
        self.db
            .schedules
            .find_by_id(id)
            .await?
            .ok_or(SixkulError::ScheduleNotFound { id })
    }

    /// List schedule slots for an extracurricular
    pub async fn list_schedules(&self, extracurricular_id: i64) -> Result<Vec<Schedule>> {
        self.extracurriculars.get(extracurricular_id).await?;
        self.db.schedules.list_by_extracurricular(extracurricular_id).await
    }

    /// Materialize sessions for a schedule over a date range. Dates that
    /// already carry a session for this schedule are skipped.
    pub async fn generate_sessions(
        &self,
        ctx: &AuthContext,
        schedule_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Session>> {
        let schedule = self.get_schedule(schedule_id).await?;
        self.extracurriculars
            .assert_can_manage(ctx, schedule.extracurricular_id)
            .await?;

        if from > to {
            return Err(SixkulError::InvalidInput(
                "generation range start is after its end".to_string(),
            ));
        }
        if (to - from).num_days() >= MAX_GENERATION_DAYS {
            return Err(SixkulError::InvalidInput(format!(
                "generation range is limited to {MAX_GENERATION_DAYS} days"
            )));
        }
        if !schedule.is_active {
            return Err(SixkulError::InvalidInput(
                "schedule slot is not active".to_string(),
            ));
        }

        let mut created = Vec::new();
        for date in matching_dates(schedule.day_of_week, from, to) {
            let session = self
                .db
                .sessions
                .insert_generated(
                    schedule.extracurricular_id,
                    schedule.id,
                    date,
                    schedule.start_time,
                    schedule.end_time,
                    schedule.location.as_deref(),
                    ctx.user_id(),
                )
                .await?;
            if let Some(session) = session {
                created.push(session);
            }
        }

        info!(
            schedule_id = schedule_id,
            from = %from,
            to = %to,
            created = created.len(),
            "Sessions generated"
        );
        Ok(created)
    }

    /// Create an ad hoc session
    pub async fn create_session(
        &self,
        ctx: &AuthContext,
        request: CreateSessionRequest,
    ) -> Result<Session> {
        self.extracurriculars
            .assert_can_manage(ctx, request.extracurricular_id)
            .await?;

        if request.start_time >= request.end_time {
            return Err(SixkulError::InvalidInput(
                "session start must be before its end".to_string(),
            ));
        }

        let session = self.db.sessions.create_adhoc(&request, ctx.user_id()).await?;
        info!(session_id = session.id, "Ad hoc session created");
        Ok(session)
    }

    /// Update session details. Locked once attendance has been recorded;
    /// cancellation goes through `cancel_session` so its guards and member
    /// notifications are not skipped.
    pub async fn update_session(
        &self,
        ctx: &AuthContext,
        id: i64,
        request: UpdateSessionRequest,
    ) -> Result<Session> {
        let session = self.get_session(id).await?;
        self.extracurriculars
            .assert_can_manage(ctx, session.extracurricular_id)
            .await?;

        if !self.db.attendance.list_by_session(id).await?.is_empty() {
            return Err(SixkulError::InvalidInput(
                "session already has attendance recorded".to_string(),
            ));
        }
        if request.status == Some(SessionStatus::Cancelled) {
            return Err(SixkulError::InvalidInput(
                "use the cancel endpoint to cancel a session".to_string(),
            ));
        }

        let start = request.start_time.unwrap_or(session.start_time);
        let end = request.end_time.unwrap_or(session.end_time);
        if start >= end {
            return Err(SixkulError::InvalidInput(
                "session start must be before its end".to_string(),
            ));
        }

        self.db.sessions.update(id, &request).await
    }

    /// Cancel a session. Only possible while no attendance has been taken.
    pub async fn cancel_session(&self, ctx: &AuthContext, id: i64) -> Result<Session> {
        let session = self.get_session(id).await?;
        let ekskul = self
            .extracurriculars
            .assert_can_manage(ctx, session.extracurricular_id)
            .await?;

        if session.status() != SessionStatus::Scheduled {
            return Err(SixkulError::InvalidStateTransition {
                from: session.status().to_string(),
                to: SessionStatus::Cancelled.to_string(),
            });
        }
        if !self.db.attendance.list_by_session(id).await?.is_empty() {
            return Err(SixkulError::InvalidInput(
                "session already has attendance recorded".to_string(),
            ));
        }

        let session = self.db.sessions.set_status(id, SessionStatus::Cancelled).await?;
        info!(session_id = id, "Session cancelled");

        // Tell active members the meeting is off.
        let members = self
            .db
            .enrollments
            .list_by_extracurricular(
                session.extracurricular_id,
                Some(crate::models::EnrollmentStatus::Active),
            )
            .await?;
        let student_ids: Vec<i64> = members.iter().map(|e| e.student_id).collect();
        let mut params = HashMap::new();
        params.insert("extracurricular_name".to_string(), ekskul.name);
        params.insert("session_date".to_string(), session.session_date.to_string());
        if let Err(e) = self
            .notifications
            .notify_many(&student_ids, "session_cancelled", &params, Some(session.id))
            .await
        {
            warn!(error = %e, "Failed to notify members about cancellation");
        }

        Ok(session)
    }

    pub async fn get_session(&self, id: i64) -> Result<Session> {
        self.db
            .sessions
            .find_by_id(id)
            .await?
            .ok_or(SixkulError::SessionNotFound { id })
    }

    /// List sessions for an extracurricular
    pub async fn list_sessions(
        &self,
        extracurricular_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Session>> {
        self.extracurriculars.get(extracurricular_id).await?;
        self.db
            .sessions
            .list_by_extracurricular(extracurricular_id, from, to)
            .await
    }

    fn validate_slot(
        day_of_week: i16,
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    ) -> Result<()> {
        if !(0..=6).contains(&day_of_week) {
            return Err(SixkulError::InvalidInput(
                "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
            ));
        }
        if start >= end {
            return Err(SixkulError::InvalidInput(
                "schedule start must be before its end".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_matching_dates_walks_weekly() {
        // 2024-01-01 is a Monday.
        let dates = matching_dates(0, date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 8),
                date(2024, 1, 15),
                date(2024, 1, 22),
                date(2024, 1, 29),
            ]
        );
    }

    #[test]
    fn test_matching_dates_offset_start() {
        // Friday sessions requested from a Monday.
        let dates = matching_dates(4, date(2024, 1, 1), date(2024, 1, 14));
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 12)]);
    }

    #[test]
    fn test_matching_dates_single_day_range() {
        let sunday = date(2024, 1, 7);
        assert_eq!(matching_dates(6, sunday, sunday), vec![sunday]);
        assert!(matching_dates(0, sunday, sunday).is_empty());
    }

    #[test]
    fn test_matching_dates_rejects_bad_input() {
        assert!(matching_dates(7, date(2024, 1, 1), date(2024, 1, 31)).is_empty());
        assert!(matching_dates(0, date(2024, 2, 1), date(2024, 1, 1)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_matching_dates_all_on_requested_weekday(
            day in 0i16..=6,
            start_offset in 0i64..1000,
            span in 0i64..120,
        ) {
            let from = date(2024, 1, 1) + Duration::days(start_offset);
            let to = from + Duration::days(span);
            let dates = matching_dates(day, from, to);

            for d in &dates {
                prop_assert_eq!(d.weekday().num_days_from_monday() as i16, day);
                prop_assert!(*d >= from && *d <= to);
            }

            // Consecutive hits are exactly one week apart.
            for pair in dates.windows(2) {
                prop_assert_eq!((pair[1] - pair[0]).num_days(), 7);
            }

            // A weekday occurs once per started week of the range.
            let expected = (span / 7) as usize;
            prop_assert!(dates.len() == expected || dates.len() == expected + 1);
        }
    }
}
