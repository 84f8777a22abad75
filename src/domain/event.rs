use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::ApprovalStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Maximum number of registrations. 0 means unlimited.
    pub capacity: u32,
    pub status: ApprovalStatus,
    pub created_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Derived from the live registration count; never persisted.
    pub fn is_full(&self, registration_count: i64) -> bool {
        self.capacity > 0 && registration_count >= i64::from(self.capacity)
    }

    pub fn has_passed(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.registration_deadline
            .map(|deadline| deadline < now)
            .unwrap_or(false)
    }
}

/// An event with its current registration figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub registration_count: i64,
    pub is_full: bool,
}

impl EventDetail {
    pub fn new(event: Event, registration_count: i64) -> Self {
        let is_full = event.is_full(registration_count);
        Self { event, registration_count, is_full }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub date: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationWithEvent {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "registration")]
pub enum RegisterOutcome {
    Registered(Registration),
    AlreadyRegistered,
}

impl RegisterOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RegisterOutcome::Registered(_) => "You have successfully registered for this event.",
            RegisterOutcome::AlreadyRegistered => "You are already registered for this event.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    Cancelled,
    NotRegistered,
}

impl CancelOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            CancelOutcome::Cancelled => "Your registration has been cancelled.",
            CancelOutcome::NotRegistered => "You are not registered for this event.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(capacity: u32) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            title: "Robotics demo".to_string(),
            description: String::new(),
            location: "Lab 3".to_string(),
            date: now + Duration::days(2),
            registration_deadline: Some(now + Duration::days(1)),
            capacity,
            status: ApprovalStatus::Pending,
            created_by: None,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn zero_capacity_is_never_full() {
        assert!(!event(0).is_full(10_000));
    }

    #[test]
    fn full_at_capacity() {
        let e = event(2);
        assert!(!e.is_full(1));
        assert!(e.is_full(2));
        assert!(e.is_full(3));
    }

    #[test]
    fn deadline_and_date_checks() {
        let e = event(0);
        let now = Utc::now();
        assert!(!e.has_passed(now));
        assert!(!e.deadline_passed(now));
        assert!(e.deadline_passed(now + Duration::hours(36)));
        assert!(e.has_passed(now + Duration::days(3)));
    }

    #[test]
    fn detail_recomputes_is_full() {
        let detail = EventDetail::new(event(1), 1);
        assert!(detail.is_full);
        assert_eq!(detail.registration_count, 1);
    }
}
