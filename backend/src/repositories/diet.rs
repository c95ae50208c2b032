//! Diet repository - diets and their food lines
//!
//! Write functions take a `PgConnection` so they can run inside the caller's
//! transaction, and return `sqlx::Error` untouched so constraint violations
//! can be told apart from infrastructure failures.

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::rows_per_statement;

const DETAIL_COLUMNS: usize = 7;

/// Diet from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DietRecord {
    pub id: i64,
    pub description: String,
    pub customer_id: Uuid,
}

/// Food line of a diet
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DietFoodDetailRecord {
    pub id: i64,
    pub diet_id: i64,
    pub food_id: i64,
    pub desired_grams: Decimal,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub calories: Decimal,
}

/// Diet parent row to write
#[derive(Debug, Clone)]
pub struct NewDiet {
    pub description: String,
    pub customer_id: Uuid,
}

/// Food line to write; `diet_id` is stamped at insert time
#[derive(Debug, Clone)]
pub struct NewDietFoodDetail {
    pub food_id: i64,
    pub desired_grams: Decimal,
    pub proteins: Decimal,
    pub carbohydrates: Decimal,
    pub fats: Decimal,
    pub calories: Decimal,
}

/// Diet repository
pub struct DietRepository;

impl DietRepository {
    pub async fn insert(conn: &mut PgConnection, diet: &NewDiet) -> sqlx::Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO diets (description, customer_id)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&diet.description)
        .bind(diet.customer_id)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    /// Insert or update a diet by id
    pub async fn upsert(conn: &mut PgConnection, id: i64, diet: &NewDiet) -> sqlx::Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO diets (id, description, customer_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET description = EXCLUDED.description
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&diet.description)
        .bind(diet.customer_id)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    /// Bulk-insert food lines for a diet, one statement per bind budget
    pub async fn insert_details(
        conn: &mut PgConnection,
        diet_id: i64,
        details: &[NewDietFoodDetail],
    ) -> sqlx::Result<u64> {
        let mut inserted = 0;
        for chunk in details.chunks(rows_per_statement(DETAIL_COLUMNS)) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO diet_food_details \
                 (diet_id, food_id, desired_grams, proteins, carbohydrates, fats, calories) ",
            );
            builder.push_values(chunk, |mut row, detail| {
                row.push_bind(diet_id)
                    .push_bind(detail.food_id)
                    .push_bind(detail.desired_grams)
                    .push_bind(detail.proteins)
                    .push_bind(detail.carbohydrates)
                    .push_bind(detail.fats)
                    .push_bind(detail.calories);
            });

            inserted += builder.build().execute(&mut *conn).await?.rows_affected();
        }
        Ok(inserted)
    }

    pub async fn delete_details(conn: &mut PgConnection, diet_id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM diet_food_details WHERE diet_id = $1")
            .bind(diet_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<DietRecord>> {
        let diet = sqlx::query_as::<_, DietRecord>(
            "SELECT id, description, customer_id FROM diets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(diet)
    }

    pub async fn find_details(db: &PgPool, diet_id: i64) -> Result<Vec<DietFoodDetailRecord>> {
        let details = sqlx::query_as::<_, DietFoodDetailRecord>(
            r#"
            SELECT id, diet_id, food_id, desired_grams, proteins, carbohydrates, fats, calories
            FROM diet_food_details
            WHERE diet_id = $1
            ORDER BY id
            "#,
        )
        .bind(diet_id)
        .fetch_all(db)
        .await?;

        Ok(details)
    }
}
