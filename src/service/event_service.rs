use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    clock::Clock,
    domain::*,
    error::{AppError, Result},
    repository::{ClubRepository, EventRepository},
    service::permission_service::PermissionService,
};

const EVENT_PASSED: &str = "This event has already passed.";
const DEADLINE_PASSED: &str = "Registration deadline has passed.";
const EVENT_FULL: &str = "This event is full.";

/// Event approval (pending -> approved | rejected, reject may override an
/// approval) and capacity/deadline-guarded registration.
pub struct EventService {
    repo: Arc<dyn EventRepository>,
    club_repo: Arc<dyn ClubRepository>,
    permissions: Arc<PermissionService>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(
        repo: Arc<dyn EventRepository>,
        club_repo: Arc<dyn ClubRepository>,
        permissions: Arc<PermissionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, club_repo, permissions, clock }
    }

    async fn require_event(&self, id: Uuid) -> Result<Event> {
        self.repo.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Event"))
    }

    pub async fn get(&self, id: Uuid) -> Result<EventDetail> {
        let event = self.require_event(id).await?;
        let count = self.repo.registration_count(id).await?;
        Ok(EventDetail::new(event, count))
    }

    pub async fn upcoming(&self, query: Option<&str>, limit: i64) -> Result<Vec<Event>> {
        self.repo.list_upcoming(self.clock.now(), query, limit).await
    }

    pub async fn club_events(&self, club_id: Uuid) -> Result<Vec<Event>> {
        self.club_repo
            .find_by_id(club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club"))?;
        self.repo.list_for_club(club_id).await
    }

    pub async fn registered_upcoming(&self, user: &User) -> Result<Vec<Event>> {
        self.repo.list_registered_upcoming(user.id, self.clock.now()).await
    }

    pub async fn create_event(&self, creator: &User, club_id: Uuid, request: CreateEventRequest) -> Result<Event> {
        self.club_repo
            .find_by_id(club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club"))?;
        self.permissions.principal(creator).await?.can_manage_events(club_id).require()?;
        request.validate()?;

        let now = self.clock.now();
        if request.date <= now {
            return Err(AppError::Validation("Event date must be in the future.".to_string()));
        }
        if let Some(deadline) = request.registration_deadline {
            if deadline > request.date {
                return Err(AppError::Validation(
                    "Registration deadline must not be after the event.".to_string(),
                ));
            }
        }

        let event = self.repo.create(club_id, creator.id, request, now).await?;
        tracing::info!(event_id = %event.id, club_id = %club_id, created_by = %creator.id, "event created, awaiting approval");
        Ok(event)
    }

    /// Faculty advisors of the owning club only; campus admins included only
    /// when they advise the club.
    pub async fn approve_event(&self, actor: &User, event_id: Uuid) -> Result<Event> {
        let event = self.require_event(event_id).await?;
        self.permissions.principal(actor).await?.can_advise(event.club_id).require()?;

        let updated = self.repo.approve(event.id, actor.id, self.clock.now()).await?;
        tracing::info!(event_id = %updated.id, approved_by = %actor.id, "event approved");
        Ok(updated)
    }

    pub async fn reject_event(&self, actor: &User, event_id: Uuid) -> Result<Event> {
        let event = self.require_event(event_id).await?;
        self.permissions.principal(actor).await?.can_advise(event.club_id).require()?;

        let updated = self.repo.reject(event.id, self.clock.now()).await?;
        tracing::info!(event_id = %updated.id, rejected_by = %actor.id, "event rejected");
        Ok(updated)
    }

    fn check_open(event: &Event, registration_count: i64, now: chrono::DateTime<chrono::Utc>) -> Result<()> {
        if event.has_passed(now) {
            return Err(AppError::Validation(EVENT_PASSED.to_string()));
        }
        if event.deadline_passed(now) {
            return Err(AppError::Validation(DEADLINE_PASSED.to_string()));
        }
        if event.is_full(registration_count) {
            return Err(AppError::Validation(EVENT_FULL.to_string()));
        }
        Ok(())
    }

    pub async fn register(&self, user: &User, event_id: Uuid) -> Result<RegisterOutcome> {
        let event = self.require_event(event_id).await?;
        let now = self.clock.now();

        let count = self.repo.registration_count(event.id).await?;
        Self::check_open(&event, count, now)?;

        if self.repo.find_registration(event.id, user.id).await?.is_some() {
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        match self.repo.register_if_open(event.id, user.id, now).await {
            Ok(Some(registration)) => {
                tracing::info!(event_id = %event.id, user_id = %user.id, "registered for event");
                Ok(RegisterOutcome::Registered(registration))
            }
            Ok(None) => {
                // Someone else took the last seat between the check and the insert.
                let count = self.repo.registration_count(event.id).await?;
                Self::check_open(&event, count, now)?;
                Err(AppError::Validation(EVENT_FULL.to_string()))
            }
            Err(AppError::Conflict(_)) => Ok(RegisterOutcome::AlreadyRegistered),
            Err(e) => Err(e),
        }
    }

    pub async fn cancel(&self, user: &User, event_id: Uuid) -> Result<CancelOutcome> {
        let event = self.require_event(event_id).await?;

        if self.repo.cancel_registration(event.id, user.id).await? {
            tracing::info!(event_id = %event.id, user_id = %user.id, "registration cancelled");
            Ok(CancelOutcome::Cancelled)
        } else {
            Ok(CancelOutcome::NotRegistered)
        }
    }
}
