use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateEventRequest, Event, Registration, RegistrationWithEvent},
    error::{AppError, Result},
    repository::{like_pattern, parse_enum, parse_opt_uuid, parse_uuid, utc, EventRepository},
};

#[derive(FromRow)]
struct EventRow {
    id: String,
    club_id: String,
    title: String,
    description: String,
    location: String,
    date: NaiveDateTime,
    registration_deadline: Option<NaiveDateTime>,
    capacity: i64,
    status: String,
    created_by: Option<String>,
    approved_by: Option<String>,
    approved_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct RegistrationRow {
    id: String,
    user_id: String,
    event_id: String,
    registered_at: NaiveDateTime,
}

#[derive(FromRow)]
struct RegistrationEventRow {
    registration_id: String,
    registration_user_id: String,
    registered_at: NaiveDateTime,
    #[sqlx(flatten)]
    event: EventRow,
}

const EVENT_COLUMNS: &str = r#"
    e.id, e.club_id, e.title, e.description, e.location, e.date,
    e.registration_deadline, e.capacity, e.status, e.created_by,
    e.approved_by, e.approved_at, e.created_at, e.updated_at
"#;

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: EventRow) -> Result<Event> {
        let capacity = u32::try_from(row.capacity)
            .map_err(|_| AppError::Database(format!("Invalid event capacity: {}", row.capacity)))?;

        Ok(Event {
            id: parse_uuid(&row.id)?,
            club_id: parse_uuid(&row.club_id)?,
            title: row.title,
            description: row.description,
            location: row.location,
            date: utc(row.date),
            registration_deadline: row.registration_deadline.map(utc),
            capacity,
            status: parse_enum(&row.status)?,
            created_by: parse_opt_uuid(row.created_by.as_deref())?,
            approved_by: parse_opt_uuid(row.approved_by.as_deref())?,
            approved_at: row.approved_at.map(utc),
            created_at: utc(row.created_at),
            updated_at: utc(row.updated_at),
        })
    }

    fn row_to_registration(row: RegistrationRow) -> Result<Registration> {
        Ok(Registration {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            event_id: parse_uuid(&row.event_id)?,
            registered_at: utc(row.registered_at),
        })
    }

    async fn fetch(&self, id: Uuid) -> Result<Event> {
        self.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Event"))
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, club_id: Uuid, created_by: Uuid, request: CreateEventRequest, now: DateTime<Utc>) -> Result<Event> {
        let id = Uuid::new_v4();
        let now_naive = now.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO events (
                id, club_id, title, description, location, date,
                registration_deadline, capacity, status, created_by,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(club_id.to_string())
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.date.naive_utc())
        .bind(request.registration_deadline.map(|dt| dt.naive_utc()))
        .bind(i64::from(request.capacity))
        .bind(created_by.to_string())
        .bind(now_naive)
        .bind(now_naive)
        .execute(&self.pool)
        .await?;

        self.fetch(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let sql = format!("SELECT {} FROM events e WHERE e.id = ?", EVENT_COLUMNS);
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_event).transpose()
    }

    async fn list_upcoming(&self, now: DateTime<Utc>, query: Option<&str>, limit: i64) -> Result<Vec<Event>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM events e
            WHERE e.date >= ?1
              AND (?2 IS NULL
                   OR e.title LIKE ?2 ESCAPE '\'
                   OR e.description LIKE ?2 ESCAPE '\'
                   OR e.location LIKE ?2 ESCAPE '\')
            ORDER BY e.date ASC
            LIMIT ?3
            "#,
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(now.naive_utc())
            .bind(like_pattern(query))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn list_for_club(&self, club_id: Uuid) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events e WHERE e.club_id = ? ORDER BY e.date DESC",
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(club_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn approve(&self, id: Uuid, approver: Uuid, now: DateTime<Utc>) -> Result<Event> {
        let now_naive = now.naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = 'approved', approved_by = ?, approved_at = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(approver.to_string())
        .bind(now_naive)
        .bind(now_naive)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Event"));
        }

        self.fetch(id).await
    }

    async fn reject(&self, id: Uuid, now: DateTime<Utc>) -> Result<Event> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = 'rejected', approved_by = NULL, approved_at = NULL, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(now.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Event"));
        }

        self.fetch(id).await
    }

    async fn registration_count(&self, event_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = ?"
        )
        .bind(event_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn register_if_open(&self, event_id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Result<Option<Registration>> {
        let id = Uuid::new_v4();
        let now_naive = now.naive_utc();

        // Count and insert happen in one statement, so SQLite's write lock
        // serializes concurrent registrants for the same event.
        let result = sqlx::query(
            r#"
            INSERT INTO event_registrations (id, user_id, event_id, registered_at)
            SELECT ?1, ?2, e.id, ?3
            FROM events e
            WHERE e.id = ?4
              AND e.date >= ?3
              AND (e.registration_deadline IS NULL OR e.registration_deadline >= ?3)
              AND (
                  e.capacity = 0
                  OR (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id) < e.capacity
              )
            "#
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(now_naive)
        .bind(event_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Registration {
            id,
            user_id,
            event_id,
            registered_at: utc(now_naive),
        }))
    }

    async fn find_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, user_id, event_id, registered_at
            FROM event_registrations
            WHERE event_id = ? AND user_id = ?
            "#
        )
        .bind(event_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_registration).transpose()
    }

    async fn cancel_registration(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM event_registrations WHERE event_id = ? AND user_id = ?"
        )
        .bind(event_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_registered_upcoming(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM events e
            INNER JOIN event_registrations r ON r.event_id = e.id
            WHERE r.user_id = ? AND e.date >= ?
            ORDER BY e.date ASC
            "#,
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(user_id.to_string())
            .bind(now.naive_utc())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn list_registrations_for_user(&self, user_id: Uuid) -> Result<Vec<RegistrationWithEvent>> {
        let sql = format!(
            r#"
            SELECT r.id AS registration_id, r.user_id AS registration_user_id, r.registered_at,
                   {}
            FROM event_registrations r
            INNER JOIN events e ON e.id = r.event_id
            WHERE r.user_id = ?
            ORDER BY e.date ASC
            "#,
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, RegistrationEventRow>(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let event = Self::row_to_event(row.event)?;
                let registration = Registration {
                    id: parse_uuid(&row.registration_id)?,
                    user_id: parse_uuid(&row.registration_user_id)?,
                    event_id: event.id,
                    registered_at: utc(row.registered_at),
                };
                Ok(RegistrationWithEvent { registration, event })
            })
            .collect()
    }

    async fn recommend_from_member_clubs(&self, user_id: Uuid, now: DateTime<Utc>, limit: i64) -> Result<Vec<Event>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM events e
            WHERE e.club_id IN (
                SELECT club_id FROM club_memberships
                WHERE user_id = ?1 AND status = 'approved'
            )
            AND e.date > ?2
            AND e.id NOT IN (SELECT event_id FROM event_registrations WHERE user_id = ?1)
            ORDER BY e.date ASC
            LIMIT ?3
            "#,
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(user_id.to_string())
            .bind(now.naive_utc())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn recommend_popular(&self, user_id: Uuid, now: DateTime<Utc>, limit: i64) -> Result<Vec<Event>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM events e
            WHERE e.date > ?2
            AND e.id NOT IN (SELECT event_id FROM event_registrations WHERE user_id = ?1)
            ORDER BY (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id) DESC,
                     e.date ASC
            LIMIT ?3
            "#,
            EVENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(user_id.to_string())
            .bind(now.naive_utc())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }
}
