use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{ApprovalStatus, Club, ClubWithStats, CreateClubRequest, MembershipRole, UpdateClubRequest},
    error::{AppError, Result},
    repository::{like_pattern, parse_enum, parse_uuid, utc, ClubRepository},
};

#[derive(FromRow)]
struct ClubRow {
    id: String,
    name: String,
    description: String,
    category: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct ClubStatsRow {
    id: String,
    name: String,
    description: String,
    category: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    member_count: i64,
}

const APPROVED_COUNT: &str =
    "(SELECT COUNT(*) FROM club_memberships m WHERE m.club_id = c.id AND m.status = 'approved')";

pub struct SqliteClubRepository {
    pool: SqlitePool,
}

impl SqliteClubRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_club(row: ClubRow) -> Result<Club> {
        Ok(Club {
            id: parse_uuid(&row.id)?,
            name: row.name,
            description: row.description,
            category: parse_enum(&row.category)?,
            created_at: utc(row.created_at),
            updated_at: utc(row.updated_at),
        })
    }

    fn row_to_stats(row: ClubStatsRow) -> Result<ClubWithStats> {
        let member_count = row.member_count;
        let club = Self::row_to_club(ClubRow {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })?;
        Ok(ClubWithStats { club, member_count })
    }
}

#[async_trait]
impl ClubRepository for SqliteClubRepository {
    async fn create(&self, request: CreateClubRequest, advisor: Option<Uuid>, now: DateTime<Utc>) -> Result<Club> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now_naive = now.naive_utc();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO clubs (id, name, description, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.category.as_str())
        .bind(now_naive)
        .bind(now_naive)
        .execute(&mut *tx)
        .await?;

        if let Some(advisor_id) = advisor {
            let advisor_str = advisor_id.to_string();
            sqlx::query(
                r#"
                INSERT INTO club_memberships (
                    id, user_id, club_id, role, status, joined_at, approved_by, approved_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&advisor_str)
            .bind(&id_str)
            .bind(MembershipRole::FacultyAdvisor.as_str())
            .bind(ApprovalStatus::Approved.as_str())
            .bind(now_naive)
            .bind(&advisor_str)
            .bind(now_naive)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created club".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Club>> {
        let row = sqlx::query_as::<_, ClubRow>(
            r#"
            SELECT id, name, description, category, created_at, updated_at
            FROM clubs
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_club).transpose()
    }

    async fn list(&self, query: Option<&str>) -> Result<Vec<Club>> {
        let pattern = like_pattern(query);

        let rows = sqlx::query_as::<_, ClubRow>(
            r#"
            SELECT id, name, description, category, created_at, updated_at
            FROM clubs
            WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\' OR description LIKE ?1 ESCAPE '\'
            ORDER BY name ASC
            "#
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_club).collect()
    }

    async fn list_popular(&self, limit: i64) -> Result<Vec<ClubWithStats>> {
        let sql = format!(
            r#"
            SELECT c.id, c.name, c.description, c.category, c.created_at, c.updated_at,
                   {count} AS member_count
            FROM clubs c
            ORDER BY member_count DESC, c.name ASC
            LIMIT ?
            "#,
            count = APPROVED_COUNT
        );

        let rows = sqlx::query_as::<_, ClubStatsRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_stats).collect()
    }

    async fn list_for_member(&self, user_id: Uuid) -> Result<Vec<Club>> {
        let rows = sqlx::query_as::<_, ClubRow>(
            r#"
            SELECT c.id, c.name, c.description, c.category, c.created_at, c.updated_at
            FROM clubs c
            INNER JOIN club_memberships m ON m.club_id = c.id
            WHERE m.user_id = ? AND m.status = 'approved'
            ORDER BY c.name ASC
            "#
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_club).collect()
    }

    async fn update(&self, id: Uuid, update: UpdateClubRequest, now: DateTime<Utc>) -> Result<Club> {
        let category = update.category.map(|c| c.as_str());

        let result = sqlx::query(
            r#"
            UPDATE clubs
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                category = COALESCE(?, category),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(category)
        .bind(now.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Club"));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated club".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM clubs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn member_count(&self, id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM club_memberships WHERE club_id = ? AND status = 'approved'"
        )
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn recommend_by_category(&self, user_id: Uuid, limit: i64) -> Result<Vec<ClubWithStats>> {
        let sql = format!(
            r#"
            SELECT c.id, c.name, c.description, c.category, c.created_at, c.updated_at,
                   {count} AS member_count
            FROM clubs c
            WHERE c.category IN (
                SELECT mc.category
                FROM clubs mc
                INNER JOIN club_memberships mm ON mm.club_id = mc.id
                WHERE mm.user_id = ?1 AND mm.status = 'approved'
            )
            AND c.id NOT IN (
                SELECT club_id FROM club_memberships
                WHERE user_id = ?1 AND status IN ('pending', 'approved')
            )
            ORDER BY member_count DESC, c.name ASC
            LIMIT ?2
            "#,
            count = APPROVED_COUNT
        );

        let rows = sqlx::query_as::<_, ClubStatsRow>(&sql)
            .bind(user_id.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_stats).collect()
    }

    async fn recommend_popular(&self, user_id: Uuid, limit: i64) -> Result<Vec<ClubWithStats>> {
        let sql = format!(
            r#"
            SELECT c.id, c.name, c.description, c.category, c.created_at, c.updated_at,
                   {count} AS member_count
            FROM clubs c
            WHERE c.id NOT IN (
                SELECT club_id FROM club_memberships
                WHERE user_id = ?1 AND status IN ('pending', 'approved')
            )
            ORDER BY member_count DESC, c.name ASC
            LIMIT ?2
            "#,
            count = APPROVED_COUNT
        );

        let rows = sqlx::query_as::<_, ClubStatsRow>(&sql)
            .bind(user_id.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_stats).collect()
    }
}
