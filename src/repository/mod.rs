use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;
use crate::domain::*;
use crate::error::{AppError, Result};

pub mod user_repository;
pub mod club_repository;
pub mod membership_repository;
pub mod event_repository;

pub use user_repository::SqliteUserRepository;
pub use club_repository::SqliteClubRepository;
pub use membership_repository::SqliteMembershipRepository;
pub use event_repository::SqliteEventRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and all profile attributes in one transaction.
    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn update_profile(&self, id: Uuid, update: UpdateProfileRequest, now: DateTime<Utc>) -> Result<User>;
}

#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Creates the club and, when `advisor` is given, an approved
    /// faculty-advisor membership for that user, atomically.
    async fn create(&self, request: CreateClubRequest, advisor: Option<Uuid>, now: DateTime<Utc>) -> Result<Club>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Club>>;
    async fn list(&self, query: Option<&str>) -> Result<Vec<Club>>;
    async fn list_popular(&self, limit: i64) -> Result<Vec<ClubWithStats>>;
    async fn list_for_member(&self, user_id: Uuid) -> Result<Vec<Club>>;
    async fn update(&self, id: Uuid, update: UpdateClubRequest, now: DateTime<Utc>) -> Result<Club>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn member_count(&self, id: Uuid) -> Result<i64>;
    async fn recommend_by_category(&self, user_id: Uuid, limit: i64) -> Result<Vec<ClubWithStats>>;
    async fn recommend_popular(&self, user_id: Uuid, limit: i64) -> Result<Vec<ClubWithStats>>;
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membership>>;
    async fn find_for(&self, user_id: Uuid, club_id: Uuid) -> Result<Option<Membership>>;
    async fn list_approved_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>>;
    async fn list_for_club(&self, club_id: Uuid, status: ApprovalStatus) -> Result<Vec<MembershipWithUser>>;
    async fn list_for_user_with_clubs(&self, user_id: Uuid) -> Result<Vec<MembershipWithClub>>;
    /// Fails with `AppError::Conflict` if the (user, club) pair already exists.
    async fn create_pending(&self, user_id: Uuid, club_id: Uuid, now: DateTime<Utc>) -> Result<Membership>;
    /// rejected -> pending. Returns false if the row was not rejected.
    async fn resubmit(&self, id: Uuid) -> Result<bool>;
    async fn approve(&self, id: Uuid, approver: Uuid, now: DateTime<Utc>) -> Result<Membership>;
    async fn reject(&self, id: Uuid) -> Result<Membership>;
    /// Approved plain members only. Returns false if nothing changed.
    async fn promote_to_leader(&self, id: Uuid) -> Result<bool>;
    async fn upsert_advisor(&self, user_id: Uuid, club_id: Uuid, approver: Uuid, now: DateTime<Utc>) -> Result<Membership>;
    /// Deletes unless the row is a faculty-advisor membership.
    async fn delete_removable(&self, id: Uuid) -> Result<bool>;
    async fn delete_for(&self, user_id: Uuid, club_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, club_id: Uuid, created_by: Uuid, request: CreateEventRequest, now: DateTime<Utc>) -> Result<Event>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    async fn list_upcoming(&self, now: DateTime<Utc>, query: Option<&str>, limit: i64) -> Result<Vec<Event>>;
    async fn list_for_club(&self, club_id: Uuid) -> Result<Vec<Event>>;
    async fn approve(&self, id: Uuid, approver: Uuid, now: DateTime<Utc>) -> Result<Event>;
    async fn reject(&self, id: Uuid, now: DateTime<Utc>) -> Result<Event>;
    async fn registration_count(&self, event_id: Uuid) -> Result<i64>;
    /// Inserts a registration only if the event is still open and has room,
    /// as a single statement. `None` means the guard refused the insert;
    /// a duplicate surfaces as `AppError::Conflict`.
    async fn register_if_open(&self, event_id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Result<Option<Registration>>;
    async fn find_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>>;
    async fn cancel_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn list_registered_upcoming(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Event>>;
    async fn list_registrations_for_user(&self, user_id: Uuid) -> Result<Vec<RegistrationWithEvent>>;
    async fn recommend_from_member_clubs(&self, user_id: Uuid, now: DateTime<Utc>, limit: i64) -> Result<Vec<Event>>;
    async fn recommend_popular(&self, user_id: Uuid, now: DateTime<Utc>, limit: i64) -> Result<Vec<Event>>;
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
}

pub(crate) fn parse_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
    s.map(parse_uuid).transpose()
}

pub(crate) fn utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(dt, Utc)
}

pub(crate) fn parse_enum<T: std::str::FromStr<Err = String>>(s: &str) -> Result<T> {
    s.parse::<T>().map_err(AppError::Database)
}

/// `%term%` for LIKE searches; blank queries mean "no filter". `%`, `_`
/// and `\` in the term match literally, paired with `ESCAPE '\'`.
pub(crate) fn like_pattern(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| {
            let escaped = q
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
}
