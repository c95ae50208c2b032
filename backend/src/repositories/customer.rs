//! Customer repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use diet_tracker_shared::UserType;
use sqlx::PgPool;
use uuid::Uuid;

/// Customer record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    #[sqlx(rename = "type")]
    pub user_type: String,
    pub created_at: DateTime<Utc>,
}

impl CustomerRecord {
    /// Parsed role; the column is constrained to REGULAR or PREMIUM
    pub fn role(&self) -> Result<UserType> {
        Ok(self.user_type.parse::<UserType>()?)
    }
}

/// Input for creating a customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub user_type: UserType,
}

/// Customer repository
pub struct CustomerRepository;

impl CustomerRepository {
    pub async fn create(pool: &PgPool, input: NewCustomer) -> Result<CustomerRecord> {
        let customer = sqlx::query_as::<_, CustomerRecord>(
            r#"
            INSERT INTO customers (email, password_hash, name, last_name, username, type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, name, last_name, username, type, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.name)
        .bind(&input.last_name)
        .bind(&input.username)
        .bind(input.user_type.as_str())
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<CustomerRecord>> {
        let customer = sqlx::query_as::<_, CustomerRecord>(
            r#"
            SELECT id, email, password_hash, name, last_name, username, type, created_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CustomerRecord>> {
        let customer = sqlx::query_as::<_, CustomerRecord>(
            r#"
            SELECT id, email, password_hash, name, last_name, username, type, created_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Current stored type of a customer, `None` if the customer doesn't exist
    pub async fn find_type(pool: &PgPool, id: Uuid) -> Result<Option<UserType>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT type FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.map(|(value,)| value.parse::<UserType>().map_err(anyhow::Error::from))
            .transpose()
    }

    pub async fn update_type(
        pool: &PgPool,
        id: Uuid,
        user_type: UserType,
    ) -> Result<Option<CustomerRecord>> {
        let customer = sqlx::query_as::<_, CustomerRecord>(
            r#"
            UPDATE customers SET type = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, last_name, username, type, created_at
            "#,
        )
        .bind(id)
        .bind(user_type.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists.0)
    }
}
