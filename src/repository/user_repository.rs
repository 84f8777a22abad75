use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{NewUser, Role, UpdateProfileRequest, User},
    error::{AppError, Result},
    repository::{parse_enum, parse_uuid, utc, UserRepository},
};

#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    role: String,
    department: String,
    bio: String,
    student_id: Option<String>,
    faculty_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: parse_enum(&row.role)?,
            department: row.department,
            bio: row.bio,
            student_id: row.student_id,
            faculty_id: row.faculty_id,
            created_at: utc(row.created_at),
            updated_at: utc(row.updated_at),
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> Result<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now_naive = now.naive_utc();

        let is_student = user.role == Role::Student;
        let faculty_id = if user.role == Role::Faculty { user.faculty_id } else { None };

        // Student numbers follow the account count, including the new row.
        // Count and insert are one statement so they share one write lock.
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, first_name, last_name, role,
                department, bio, student_id, faculty_id, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                CASE WHEN ?9 THEN (SELECT printf('STU%04d', COUNT(*) + 1) FROM users) END,
                ?10, ?11, ?11
            )
            "#
        )
        .bind(&id_str)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(&user.department)
        .bind(&user.bio)
        .bind(is_student)
        .bind(&faculty_id)
        .bind(now_naive)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created user".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, first_name, last_name, role,
                   department, bio, student_id, faculty_id, created_at, updated_at
            FROM users
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, first_name, last_name, role,
                   department, bio, student_id, faculty_id, created_at, updated_at
            FROM users
            WHERE username = ?
            "#
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn update_profile(&self, id: Uuid, update: UpdateProfileRequest, now: DateTime<Utc>) -> Result<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET bio = COALESCE(?, bio),
                department = COALESCE(?, department),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.bio)
        .bind(&update.department)
        .bind(now.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated user".to_string())
        })
    }
}
