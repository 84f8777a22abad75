use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{
        ApprovalStatus, Club, Membership, MembershipRole, MembershipWithClub, MembershipWithUser,
    },
    error::{AppError, Result},
    repository::{parse_enum, parse_opt_uuid, parse_uuid, utc, MembershipRepository},
};

#[derive(FromRow)]
struct MembershipRow {
    id: String,
    user_id: String,
    club_id: String,
    role: String,
    status: String,
    joined_at: NaiveDateTime,
    approved_by: Option<String>,
    approved_at: Option<NaiveDateTime>,
}

#[derive(FromRow)]
struct MembershipUserRow {
    id: String,
    user_id: String,
    club_id: String,
    role: String,
    status: String,
    joined_at: NaiveDateTime,
    approved_by: Option<String>,
    approved_at: Option<NaiveDateTime>,
    username: String,
    first_name: String,
    last_name: String,
}

#[derive(FromRow)]
struct MembershipClubRow {
    id: String,
    user_id: String,
    club_id: String,
    role: String,
    status: String,
    joined_at: NaiveDateTime,
    approved_by: Option<String>,
    approved_at: Option<NaiveDateTime>,
    club_name: String,
    club_description: String,
    club_category: String,
    club_created_at: NaiveDateTime,
    club_updated_at: NaiveDateTime,
}

const MEMBERSHIP_COLUMNS: &str =
    "m.id, m.user_id, m.club_id, m.role, m.status, m.joined_at, m.approved_by, m.approved_at";

pub struct SqliteMembershipRepository {
    pool: SqlitePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_membership(row: MembershipRow) -> Result<Membership> {
        Ok(Membership {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            club_id: parse_uuid(&row.club_id)?,
            role: parse_enum(&row.role)?,
            status: parse_enum(&row.status)?,
            joined_at: utc(row.joined_at),
            approved_by: parse_opt_uuid(row.approved_by.as_deref())?,
            approved_at: row.approved_at.map(utc),
        })
    }

    fn row_to_with_user(row: MembershipUserRow) -> Result<MembershipWithUser> {
        let full_name = format!("{} {}", row.first_name, row.last_name).trim().to_string();
        let membership = Self::row_to_membership(MembershipRow {
            id: row.id,
            user_id: row.user_id,
            club_id: row.club_id,
            role: row.role,
            status: row.status,
            joined_at: row.joined_at,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
        })?;
        Ok(MembershipWithUser { membership, username: row.username, full_name })
    }

    fn row_to_with_club(row: MembershipClubRow) -> Result<MembershipWithClub> {
        let membership = Self::row_to_membership(MembershipRow {
            id: row.id,
            user_id: row.user_id,
            club_id: row.club_id,
            role: row.role,
            status: row.status,
            joined_at: row.joined_at,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
        })?;
        let club = Club {
            id: membership.club_id,
            name: row.club_name,
            description: row.club_description,
            category: parse_enum(&row.club_category)?,
            created_at: utc(row.club_created_at),
            updated_at: utc(row.club_updated_at),
        };
        Ok(MembershipWithClub { membership, club })
    }

    async fn fetch(&self, id: Uuid) -> Result<Membership> {
        self.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Membership"))
    }
}

#[async_trait]
impl MembershipRepository for SqliteMembershipRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membership>> {
        let sql = format!("SELECT {} FROM club_memberships m WHERE m.id = ?", MEMBERSHIP_COLUMNS);
        let row = sqlx::query_as::<_, MembershipRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_membership).transpose()
    }

    async fn find_for(&self, user_id: Uuid, club_id: Uuid) -> Result<Option<Membership>> {
        let sql = format!(
            "SELECT {} FROM club_memberships m WHERE m.user_id = ? AND m.club_id = ?",
            MEMBERSHIP_COLUMNS
        );
        let row = sqlx::query_as::<_, MembershipRow>(&sql)
            .bind(user_id.to_string())
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_membership).transpose()
    }

    async fn list_approved_for_user(&self, user_id: Uuid) -> Result<Vec<Membership>> {
        let sql = format!(
            "SELECT {} FROM club_memberships m WHERE m.user_id = ? AND m.status = 'approved'",
            MEMBERSHIP_COLUMNS
        );
        let rows = sqlx::query_as::<_, MembershipRow>(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_membership).collect()
    }

    async fn list_for_club(&self, club_id: Uuid, status: ApprovalStatus) -> Result<Vec<MembershipWithUser>> {
        let sql = format!(
            r#"
            SELECT {}, u.username, u.first_name, u.last_name
            FROM club_memberships m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.club_id = ? AND m.status = ?
            ORDER BY m.joined_at ASC
            "#,
            MEMBERSHIP_COLUMNS
        );
        let rows = sqlx::query_as::<_, MembershipUserRow>(&sql)
            .bind(club_id.to_string())
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_with_user).collect()
    }

    async fn list_for_user_with_clubs(&self, user_id: Uuid) -> Result<Vec<MembershipWithClub>> {
        let sql = format!(
            r#"
            SELECT {},
                   c.name AS club_name, c.description AS club_description,
                   c.category AS club_category, c.created_at AS club_created_at,
                   c.updated_at AS club_updated_at
            FROM club_memberships m
            INNER JOIN clubs c ON c.id = m.club_id
            WHERE m.user_id = ?
            ORDER BY c.name ASC
            "#,
            MEMBERSHIP_COLUMNS
        );
        let rows = sqlx::query_as::<_, MembershipClubRow>(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_with_club).collect()
    }

    async fn create_pending(&self, user_id: Uuid, club_id: Uuid, now: DateTime<Utc>) -> Result<Membership> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO club_memberships (id, user_id, club_id, role, status, joined_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(club_id.to_string())
        .bind(MembershipRole::Member.as_str())
        .bind(ApprovalStatus::Pending.as_str())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        self.fetch(id).await
    }

    async fn resubmit(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE club_memberships
            SET status = 'pending', approved_by = NULL, approved_at = NULL
            WHERE id = ? AND status = 'rejected'
            "#
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn approve(&self, id: Uuid, approver: Uuid, now: DateTime<Utc>) -> Result<Membership> {
        let result = sqlx::query(
            r#"
            UPDATE club_memberships
            SET status = 'approved', approved_by = ?, approved_at = ?
            WHERE id = ?
            "#
        )
        .bind(approver.to_string())
        .bind(now.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Membership"));
        }

        self.fetch(id).await
    }

    async fn reject(&self, id: Uuid) -> Result<Membership> {
        // Clearing the approver keeps a rejected row from looking approved.
        let result = sqlx::query(
            r#"
            UPDATE club_memberships
            SET status = 'rejected', approved_by = NULL, approved_at = NULL
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Membership"));
        }

        self.fetch(id).await
    }

    async fn promote_to_leader(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE club_memberships
            SET role = 'leader'
            WHERE id = ? AND status = 'approved' AND role = 'member'
            "#
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn upsert_advisor(&self, user_id: Uuid, club_id: Uuid, approver: Uuid, now: DateTime<Utc>) -> Result<Membership> {
        let now_naive = now.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO club_memberships (
                id, user_id, club_id, role, status, joined_at, approved_by, approved_at
            ) VALUES (?, ?, ?, 'faculty_advisor', 'approved', ?, ?, ?)
            ON CONFLICT (user_id, club_id) DO UPDATE SET
                role = 'faculty_advisor',
                status = 'approved',
                approved_by = excluded.approved_by,
                approved_at = excluded.approved_at
            "#
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(club_id.to_string())
        .bind(now_naive)
        .bind(approver.to_string())
        .bind(now_naive)
        .execute(&self.pool)
        .await?;

        self.find_for(user_id, club_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve advisor membership".to_string())
        })
    }

    async fn delete_removable(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM club_memberships WHERE id = ? AND role != 'faculty_advisor'"
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_for(&self, user_id: Uuid, club_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM club_memberships WHERE user_id = ? AND club_id = ?"
        )
        .bind(user_id.to_string())
        .bind(club_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
