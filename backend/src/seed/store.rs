//! Where generated rows go
//!
//! `PgSeedStore` bulk-inserts into PostgreSQL; `InMemorySeedStore` keeps rows
//! in memory for dry runs and tests.

use super::error::SeedError;
use super::registry::{IdKind, ModelDefinition};
use crate::repositories::rows_per_statement;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Parents sampled per relation when reusing existing rows
pub const PARENT_SAMPLE_SIZE: usize = 10;

/// A typed column value
#[derive(Debug, Clone, PartialEq)]
pub enum SeedValue {
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
    Uuid(Uuid),
}

/// Column name to value
pub type SeedRow = BTreeMap<&'static str, SeedValue>;

#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Insert rows and return their ids in row order
    async fn insert_rows(
        &self,
        model: &'static ModelDefinition,
        rows: Vec<SeedRow>,
    ) -> Result<Vec<SeedValue>, SeedError>;

    /// Ids of up to `limit` existing rows, in random order
    async fn sample_ids(
        &self,
        model: &'static ModelDefinition,
        limit: usize,
    ) -> Result<Vec<SeedValue>, SeedError>;
}

/// Columns shared by every row, or an error if rows disagree
fn shared_columns(
    model: &ModelDefinition,
    rows: &[SeedRow],
) -> Result<Vec<&'static str>, SeedError> {
    let columns: Vec<&'static str> = rows
        .first()
        .map(|row| row.keys().copied().collect())
        .unwrap_or_default();

    let consistent = rows
        .iter()
        .all(|row| row.len() == columns.len() && columns.iter().all(|c| row.contains_key(c)));
    if !consistent {
        return Err(SeedError::RaggedRows(model.name.to_string()));
    }
    Ok(columns)
}

pub struct PgSeedStore {
    pool: PgPool,
}

impl PgSeedStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn read_id(model: &ModelDefinition, row: &sqlx::postgres::PgRow) -> Result<SeedValue, SeedError> {
        Ok(match model.id_kind {
            IdKind::Serial => SeedValue::Int(row.try_get("id")?),
            IdKind::Uuid => SeedValue::Uuid(row.try_get("id")?),
        })
    }
}

#[async_trait]
impl SeedStore for PgSeedStore {
    async fn insert_rows(
        &self,
        model: &'static ModelDefinition,
        rows: Vec<SeedRow>,
    ) -> Result<Vec<SeedValue>, SeedError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let columns = shared_columns(model, &rows)?;

        let mut ids = Vec::with_capacity(rows.len());

        // Tables whose only columns are generated
        if columns.is_empty() {
            let sql = format!("INSERT INTO {} DEFAULT VALUES RETURNING id", model.table);
            for _ in 0..rows.len() {
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                ids.push(Self::read_id(model, &row)?);
            }
            return Ok(ids);
        }

        for chunk in rows.chunks(rows_per_statement(columns.len())) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} ({}) ",
                model.table,
                columns.join(", ")
            ));

            builder.push_values(chunk, |mut b, row| {
                for column in &columns {
                    match &row[column] {
                        SeedValue::Text(v) => b.push_bind(v.clone()),
                        SeedValue::Int(v) => b.push_bind(*v),
                        SeedValue::Decimal(v) => b.push_bind(*v),
                        SeedValue::Bool(v) => b.push_bind(*v),
                        SeedValue::Uuid(v) => b.push_bind(*v),
                    };
                }
            });
            builder.push(" RETURNING id");

            for row in builder.build().fetch_all(&self.pool).await? {
                ids.push(Self::read_id(model, &row)?);
            }
        }

        Ok(ids)
    }

    async fn sample_ids(
        &self,
        model: &'static ModelDefinition,
        limit: usize,
    ) -> Result<Vec<SeedValue>, SeedError> {
        let sql = format!("SELECT id FROM {} ORDER BY random() LIMIT $1", model.table);
        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| Self::read_id(model, row)).collect()
    }
}

#[derive(Default)]
struct Tables {
    rows: BTreeMap<&'static str, Vec<SeedRow>>,
    next_serial: BTreeMap<&'static str, i64>,
}

/// Keeps inserted rows in memory, ids included under `id`
#[derive(Default)]
pub struct InMemorySeedStore {
    tables: Mutex<Tables>,
}

impl InMemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows inserted so far for a model
    pub fn rows(&self, model: &str) -> Vec<SeedRow> {
        self.lock()
            .rows
            .get(model)
            .cloned()
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A poisoned lock only means another test thread panicked mid-insert
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SeedStore for InMemorySeedStore {
    async fn insert_rows(
        &self,
        model: &'static ModelDefinition,
        rows: Vec<SeedRow>,
    ) -> Result<Vec<SeedValue>, SeedError> {
        shared_columns(model, &rows)?;

        let mut tables = self.lock();
        let mut ids = Vec::with_capacity(rows.len());
        let mut stored = Vec::with_capacity(rows.len());

        for mut row in rows {
            let id = match model.id_kind {
                IdKind::Serial => {
                    let next = tables.next_serial.entry(model.name).or_insert(0);
                    *next += 1;
                    SeedValue::Int(*next)
                }
                IdKind::Uuid => SeedValue::Uuid(Uuid::new_v4()),
            };
            row.insert("id", id.clone());
            ids.push(id);
            stored.push(row);
        }

        tables.rows.entry(model.name).or_default().extend(stored);
        Ok(ids)
    }

    async fn sample_ids(
        &self,
        model: &'static ModelDefinition,
        limit: usize,
    ) -> Result<Vec<SeedValue>, SeedError> {
        let mut ids: Vec<SeedValue> = self
            .lock()
            .rows
            .get(model.name)
            .map(|rows| rows.iter().filter_map(|r| r.get("id").cloned()).collect())
            .unwrap_or_default();

        ids.shuffle(&mut rand::thread_rng());
        ids.truncate(limit);
        Ok(ids)
    }
}
