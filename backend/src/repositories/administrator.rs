//! Administrator repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Administrator record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdministratorRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an administrator
#[derive(Debug, Clone)]
pub struct NewAdministrator {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Administrator repository
pub struct AdministratorRepository;

impl AdministratorRepository {
    pub async fn create(pool: &PgPool, input: NewAdministrator) -> Result<AdministratorRecord> {
        let admin = sqlx::query_as::<_, AdministratorRecord>(
            r#"
            INSERT INTO administrators (email, password_hash, name, last_name, username)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, last_name, username, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.name)
        .bind(&input.last_name)
        .bind(&input.username)
        .fetch_one(pool)
        .await?;

        Ok(admin)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdministratorRecord>> {
        let admin = sqlx::query_as::<_, AdministratorRecord>(
            r#"
            SELECT id, email, password_hash, name, last_name, username, created_at
            FROM administrators
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(admin)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<AdministratorRecord>> {
        let admin = sqlx::query_as::<_, AdministratorRecord>(
            r#"
            SELECT id, email, password_hash, name, last_name, username, created_at
            FROM administrators
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(admin)
    }
}
