#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use collegehub::{
    clock::FixedClock,
    config::Settings,
    domain::*,
    repository::{ClubRepository, EventRepository, MembershipRepository, UserRepository},
    service::ServiceContext,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tempfile::TempDir;

pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub clock: Arc<FixedClock>,
    pub pool: SqlitePool,
    // Removed on drop, so it lives as long as the pool.
    _dir: Option<TempDir>,
}

/// Noon, 1 September 2026. Every fixture is dated relative to this.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap()
}

/// A fresh in-memory database. One connection, kept alive for the whole
/// test, since each new `sqlite::memory:` connection is a separate database.
pub async fn setup() -> anyhow::Result<TestContext> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    build(pool, None).await
}

/// A WAL database file in a temporary directory behind a pool of several
/// connections, as the server runs it. Writers contend for the real
/// SQLite write lock here.
pub async fn setup_file_backed() -> anyhow::Result<TestContext> {
    let dir = tempfile::tempdir()?;
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("collegehub.db"))
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    build(pool, Some(dir)).await
}

async fn build(pool: SqlitePool, dir: Option<TempDir>) -> anyhow::Result<TestContext> {
    sqlx::migrate!("./migrations").run(&pool).await?;

    let clock = Arc::new(FixedClock::new(base_time()));
    let ctx = Arc::new(ServiceContext::new(pool.clone(), clock.clone(), &Settings::default()));

    Ok(TestContext { ctx, clock, pool, _dir: dir })
}

impl TestContext {
    pub async fn user(&self, username: &str, role: Role) -> anyhow::Result<User> {
        let user = self.ctx.user_repo
            .create(
                NewUser {
                    username: username.to_string(),
                    email: format!("{}@college.edu", username),
                    first_name: username.to_string(),
                    last_name: "Tester".to_string(),
                    role,
                    department: "Computer Science".to_string(),
                    bio: String::new(),
                    faculty_id: None,
                },
                base_time(),
            )
            .await?;
        Ok(user)
    }

    pub async fn club(&self, name: &str, category: Category) -> anyhow::Result<Club> {
        let club = self.ctx.club_repo
            .create(
                CreateClubRequest {
                    name: name.to_string(),
                    description: format!("The {} club", name),
                    category,
                },
                None,
                base_time(),
            )
            .await?;
        Ok(club)
    }

    /// An approved membership with the given role.
    pub async fn member(&self, user: &User, club: &Club, role: MembershipRole) -> anyhow::Result<Membership> {
        let repo = &self.ctx.membership_repo;

        if role == MembershipRole::FacultyAdvisor {
            return Ok(repo.upsert_advisor(user.id, club.id, user.id, base_time()).await?);
        }

        let pending = repo.create_pending(user.id, club.id, base_time()).await?;
        let approved = repo.approve(pending.id, user.id, base_time()).await?;
        if role == MembershipRole::Leader {
            repo.promote_to_leader(approved.id).await?;
            return Ok(repo.find_by_id(approved.id).await?.expect("membership exists"));
        }
        Ok(approved)
    }

    pub async fn pending(&self, user: &User, club: &Club) -> anyhow::Result<Membership> {
        Ok(self.ctx.membership_repo.create_pending(user.id, club.id, base_time()).await?)
    }

    /// An event `days` days after [`base_time`], without a registration deadline.
    pub async fn event(&self, club: &Club, creator: &User, days: i64, capacity: u32) -> anyhow::Result<Event> {
        self.event_with_deadline(club, creator, days, capacity, None).await
    }

    pub async fn event_with_deadline(
        &self,
        club: &Club,
        creator: &User,
        days: i64,
        capacity: u32,
        deadline: Option<DateTime<Utc>>,
    ) -> anyhow::Result<Event> {
        let event = self.ctx.event_repo
            .create(
                club.id,
                creator.id,
                CreateEventRequest {
                    title: format!("{} meetup +{}d", club.name, days),
                    description: String::new(),
                    location: "Main Hall".to_string(),
                    date: base_time() + Duration::days(days),
                    registration_deadline: deadline,
                    capacity,
                },
                base_time(),
            )
            .await?;
        Ok(event)
    }
}
