//! Exercise repository - exercises and their body area links

use anyhow::Result;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::rows_per_statement;

/// Exercise from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: i64,
    pub name: String,
    pub image_name: String,
}

/// Exercise parent row to write
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub name: String,
    pub image_name: String,
}

/// Exercise repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    pub async fn insert(conn: &mut PgConnection, exercise: &NewExercise) -> sqlx::Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO exercises (name, image_name)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&exercise.name)
        .bind(&exercise.image_name)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    /// Link an exercise to body areas
    pub async fn insert_body_areas(
        conn: &mut PgConnection,
        exercise_id: i64,
        body_area_ids: &[i64],
    ) -> sqlx::Result<u64> {
        let mut inserted = 0;
        for chunk in body_area_ids.chunks(rows_per_statement(2)) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO body_area_exercise_details (body_area_id, exercise_id) ",
            );
            builder.push_values(chunk, |mut row, body_area_id| {
                row.push_bind(*body_area_id).push_bind(exercise_id);
            });

            inserted += builder.build().execute(&mut *conn).await?.rows_affected();
        }
        Ok(inserted)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<ExerciseRecord>> {
        let exercise = sqlx::query_as::<_, ExerciseRecord>(
            "SELECT id, name, image_name FROM exercises WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(exercise)
    }

    pub async fn find_body_area_ids(db: &PgPool, exercise_id: i64) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT body_area_id FROM body_area_exercise_details
            WHERE exercise_id = $1
            ORDER BY id
            "#,
        )
        .bind(exercise_id)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
