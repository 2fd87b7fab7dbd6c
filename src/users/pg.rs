use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::{
    model::User,
    store::{StoreError, UserStore},
};

const SELECT_USER: &str = r#"
    SELECT id, email, name, password_hash, interests, notifications, country, bookmarks, created_at
    FROM users
    WHERE email = $1
"#;

const SELECT_USER_FOR_UPDATE: &str = r#"
    SELECT id, email, name, password_hash, interests, notifications, country, bookmarks, created_at
    FROM users
    WHERE email = $1
    FOR UPDATE
"#;

/// Postgres-backed [`UserStore`].
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    interests: Vec<String>,
    notifications: Vec<String>,
    country: String,
    bookmarks: Json<Vec<Value>>,
    created_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            interests: row.interests,
            notifications: row.notifications,
            country: row.country,
            bookmarks: row.bookmarks.0,
            created_at: row.created_at,
        }
    }
}

fn other(e: sqlx::Error) -> StoreError {
    StoreError::Other(e.into())
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(other)?;
        Ok(row.map(User::from))
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, password_hash, interests, notifications, country, bookmarks, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, email, name, password_hash, interests, notifications, country, bookmarks, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.interests)
        .bind(&user.notifications)
        .bind(&user.country)
        .bind(Json(&user.bookmarks))
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return StoreError::DuplicateEmail;
                }
            }
            other(e)
        })?;
        Ok(row.into())
    }

    async fn update(
        &self,
        email: &str,
        apply: &(dyn for<'a> Fn(&'a mut User) + Send + Sync),
    ) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await.map_err(other)?;

        // Row lock: concurrent writers against the same user queue up here
        // instead of clobbering each other's read-modify-write.
        let row = sqlx::query_as::<_, UserRow>(SELECT_USER_FOR_UPDATE)
            .bind(email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(other)?;
        let Some(row) = row else {
            return Err(StoreError::NotFound);
        };

        let mut user: User = row.into();
        apply(&mut user);

        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, password_hash = $3, interests = $4, notifications = $5, country = $6, bookmarks = $7
            WHERE email = $1
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.interests)
        .bind(&user.notifications)
        .bind(&user.country)
        .bind(Json(&user.bookmarks))
        .execute(&mut *tx)
        .await
        .map_err(other)?;

        tx.commit().await.map_err(other)?;
        Ok(user)
    }
}
