//! Routine repository - routines and their exercise lines

use anyhow::Result;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::rows_per_statement;

const DETAIL_COLUMNS: usize = 4;

/// Routine from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoutineRecord {
    pub id: i64,
    pub description: String,
}

/// Exercise line of a routine
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRoutineDetailRecord {
    pub id: i64,
    pub routine_id: i64,
    pub exercise_id: i64,
    pub series: i32,
    pub repetitions: i32,
}

/// Exercise line to write; `routine_id` is stamped at insert time
#[derive(Debug, Clone)]
pub struct NewExerciseRoutineDetail {
    pub exercise_id: i64,
    pub series: i32,
    pub repetitions: i32,
}

/// Routine repository
pub struct RoutineRepository;

impl RoutineRepository {
    pub async fn insert(conn: &mut PgConnection, description: &str) -> sqlx::Result<i64> {
        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO routines (description) VALUES ($1) RETURNING id")
                .bind(description)
                .fetch_one(conn)
                .await?;

        Ok(id)
    }

    pub async fn insert_details(
        conn: &mut PgConnection,
        routine_id: i64,
        details: &[NewExerciseRoutineDetail],
    ) -> sqlx::Result<u64> {
        let mut inserted = 0;
        for chunk in details.chunks(rows_per_statement(DETAIL_COLUMNS)) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO exercise_routine_details (routine_id, exercise_id, series, repetitions) ",
            );
            builder.push_values(chunk, |mut row, detail| {
                row.push_bind(routine_id)
                    .push_bind(detail.exercise_id)
                    .push_bind(detail.series)
                    .push_bind(detail.repetitions);
            });

            inserted += builder.build().execute(&mut *conn).await?.rows_affected();
        }
        Ok(inserted)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<RoutineRecord>> {
        let routine =
            sqlx::query_as::<_, RoutineRecord>("SELECT id, description FROM routines WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?;

        Ok(routine)
    }

    pub async fn find_details(
        db: &PgPool,
        routine_id: i64,
    ) -> Result<Vec<ExerciseRoutineDetailRecord>> {
        let details = sqlx::query_as::<_, ExerciseRoutineDetailRecord>(
            r#"
            SELECT id, routine_id, exercise_id, series, repetitions
            FROM exercise_routine_details
            WHERE routine_id = $1
            ORDER BY id
            "#,
        )
        .bind(routine_id)
        .fetch_all(db)
        .await?;

        Ok(details)
    }
}
