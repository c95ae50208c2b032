//! Catalog repository - foods and body areas
//!
//! Catalog rows are referenced by aggregate children (diet food lines,
//! exercise body areas) but never owned by them.

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Food from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: i64,
    pub description: String,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub calories: Decimal,
}

/// Input for creating a food
#[derive(Debug, Clone)]
pub struct NewFood {
    pub description: String,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub calories: Decimal,
}

/// Body area from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BodyAreaRecord {
    pub id: i64,
    pub description: String,
}

/// Food repository
pub struct FoodRepository;

impl FoodRepository {
    pub async fn create(db: &PgPool, input: NewFood) -> Result<FoodRecord> {
        let food = sqlx::query_as::<_, FoodRecord>(
            r#"
            INSERT INTO foods (description, proteins, carbohydrates, fats, calories)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, description, proteins, carbohydrates, fats, calories
            "#,
        )
        .bind(&input.description)
        .bind(input.proteins)
        .bind(input.carbohydrates)
        .bind(input.fats)
        .bind(input.calories)
        .fetch_one(db)
        .await?;

        Ok(food)
    }

    pub async fn list(db: &PgPool) -> Result<Vec<FoodRecord>> {
        let foods = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, description, proteins, carbohydrates, fats, calories
            FROM foods
            ORDER BY description
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(foods)
    }
}

/// Body area repository
pub struct BodyAreaRepository;

impl BodyAreaRepository {
    pub async fn create(db: &PgPool, description: &str) -> Result<BodyAreaRecord> {
        let area = sqlx::query_as::<_, BodyAreaRecord>(
            r#"
            INSERT INTO body_areas (description)
            VALUES ($1)
            RETURNING id, description
            "#,
        )
        .bind(description)
        .fetch_one(db)
        .await?;

        Ok(area)
    }

    pub async fn list(db: &PgPool) -> Result<Vec<BodyAreaRecord>> {
        let areas = sqlx::query_as::<_, BodyAreaRecord>(
            "SELECT id, description FROM body_areas ORDER BY description",
        )
        .fetch_all(db)
        .await?;

        Ok(areas)
    }
}
