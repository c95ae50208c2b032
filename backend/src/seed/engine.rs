//! Relation-aware seeding
//!
//! Order of work for one `seed` call:
//! 1. belongsTo parents of the target, created one per target record
//!    (recursively) or sampled from existing rows with `reuse_parents`.
//!    Independent relations run concurrently. Samples for the target and its
//!    children are all taken before the first insert.
//! 2. The target records, in one bulk insert.
//! 3. N hasMany children per target record, each child's other belongsTo
//!    relations resolved like in step 1.

use super::error::SeedError;
use super::registry::{find_model, ColumnKind, ModelDefinition, PropertyDef, SeedKind};
use super::store::{SeedRow, SeedStore, SeedValue, PARENT_SAMPLE_SIZE};
use super::templates::{CompiledModel, TemplateSet};
use crate::auth::PasswordService;
use diet_tracker_shared::models::UserType;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// hasMany children generated per target record
    pub children_per_record: usize,
    /// Sample belongsTo parents from existing rows instead of creating them
    pub reuse_parents: bool,
    /// Fixed RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            children_per_record: 3,
            reuse_parents: false,
            rng_seed: None,
        }
    }
}

/// Summary of one `seed` call
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub model: &'static str,
    pub kind: SeedKind,
    pub inserted: BTreeMap<&'static str, usize>,
}

pub struct SeedEngine<S> {
    store: Arc<S>,
    templates: TemplateSet,
    options: SeedOptions,
}

/// State shared by every task of one run
struct SeedRun<S> {
    store: Arc<S>,
    compiled: BTreeMap<&'static str, CompiledModel>,
    reuse_parents: bool,
    samples: Samples,
    rng: Mutex<StdRng>,
    inserted: Mutex<BTreeMap<&'static str, usize>>,
}

impl<S> SeedRun<S> {
    fn child_rng(&self) -> StdRng {
        let seed = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen();
        StdRng::seed_from_u64(seed)
    }

    fn record(&self, model: &'static str, count: usize) {
        *self
            .inserted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(model)
            .or_insert(0) += count;
    }
}

type SeedFuture = Pin<Box<dyn Future<Output = Result<Vec<SeedValue>, SeedError>> + Send>>;

/// Column values fixed by the caller, one value per row
type Preset = Vec<(&'static str, Vec<SeedValue>)>;

/// Existing parent ids keyed by (model, foreign key)
type Samples = BTreeMap<(&'static str, &'static str), Vec<SeedValue>>;

impl<S: SeedStore + 'static> SeedEngine<S> {
    pub fn new(store: Arc<S>, templates: TemplateSet, options: SeedOptions) -> Self {
        Self {
            store,
            templates,
            options,
        }
    }

    /// Seed `count` records of `model_name` with their relations
    pub async fn seed(&self, model_name: &str, count: i64) -> Result<SeedReport, SeedError> {
        let model =
            find_model(model_name).ok_or_else(|| SeedError::UnknownModel(model_name.to_string()))?;
        let count = match usize::try_from(count) {
            Ok(n) if n > 0 => n,
            _ => return Err(SeedError::InvalidCount(count)),
        };

        let mut compiled = BTreeMap::new();
        for involved in involved_models(model, self.options.reuse_parents)? {
            compiled.insert(involved.name, self.templates.compile(involved)?);
        }

        let per_record = self.options.children_per_record;
        let samples = if self.options.reuse_parents {
            sample_parents(&*self.store, model, per_record > 0).await?
        } else {
            Samples::new()
        };

        let rng = match self.options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let run = Arc::new(SeedRun {
            store: self.store.clone(),
            compiled,
            reuse_parents: self.options.reuse_parents,
            samples,
            rng: Mutex::new(rng),
            inserted: Mutex::new(BTreeMap::new()),
        });

        info!(
            model = model.name,
            kind = ?model.seed_kind(),
            count,
            children_per_record = self.options.children_per_record,
            reuse_parents = self.options.reuse_parents,
            "Seeding"
        );

        let ids = insert_records(run.clone(), model, count, Vec::new()).await?;

        if per_record > 0 {
            for relation in model.has_many() {
                let child = registered(relation.model)?;
                let parent_ids: Vec<SeedValue> = ids
                    .iter()
                    .flat_map(|id| std::iter::repeat(id.clone()).take(per_record))
                    .collect();

                debug!(parent = model.name, child = child.name, "Seeding hasMany children");
                insert_records(
                    run.clone(),
                    child,
                    parent_ids.len(),
                    vec![(relation.foreign_key, parent_ids)],
                )
                .await?;
            }
        }

        let inserted = run
            .inserted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        info!(model = model.name, ?inserted, "Seeding finished");

        Ok(SeedReport {
            model: model.name,
            kind: model.seed_kind(),
            inserted,
        })
    }
}

/// Sample existing parents for every belongsTo relation a reuse run fills
///
/// Fails on the first parent model without rows, before anything is written.
async fn sample_parents<S: SeedStore>(
    store: &S,
    target: &'static ModelDefinition,
    with_children: bool,
) -> Result<Samples, SeedError> {
    let mut wanted = vec![(target, None)];
    if with_children {
        for relation in target.has_many() {
            wanted.push((registered(relation.model)?, Some(relation.foreign_key)));
        }
    }

    let mut samples = Samples::new();
    for (model, preset_key) in wanted {
        for relation in model.belongs_to() {
            if Some(relation.foreign_key) == preset_key {
                continue;
            }
            let parent = registered(relation.model)?;
            let sample = store.sample_ids(parent, PARENT_SAMPLE_SIZE).await?;
            if sample.is_empty() {
                return Err(SeedError::NoParentRows {
                    model: model.name.to_string(),
                    parent: parent.name.to_string(),
                });
            }
            samples.insert((model.name, relation.foreign_key), sample);
        }
    }
    Ok(samples)
}

fn registered(name: &str) -> Result<&'static ModelDefinition, SeedError> {
    find_model(name).ok_or_else(|| SeedError::UnknownModel(name.to_string()))
}

/// Models whose templates a run will render
fn involved_models(
    target: &'static ModelDefinition,
    reuse_parents: bool,
) -> Result<Vec<&'static ModelDefinition>, SeedError> {
    let mut seen = BTreeSet::new();
    let mut models = Vec::new();

    collect_with_parents(target, None, reuse_parents, &mut seen, &mut models)?;
    for relation in target.has_many() {
        let child = registered(relation.model)?;
        collect_with_parents(
            child,
            Some(relation.foreign_key),
            reuse_parents,
            &mut seen,
            &mut models,
        )?;
    }
    Ok(models)
}

fn collect_with_parents(
    model: &'static ModelDefinition,
    preset_key: Option<&str>,
    reuse_parents: bool,
    seen: &mut BTreeSet<&'static str>,
    models: &mut Vec<&'static ModelDefinition>,
) -> Result<(), SeedError> {
    if seen.insert(model.name) {
        models.push(model);
    }
    if reuse_parents {
        return Ok(());
    }
    for relation in model.belongs_to() {
        if Some(relation.foreign_key) == preset_key {
            continue;
        }
        let parent = registered(relation.model)?;
        collect_with_parents(parent, None, reuse_parents, seen, models)?;
    }
    Ok(())
}

/// Generate, link and insert `count` records of `model`
fn insert_records<S: SeedStore + 'static>(
    run: Arc<SeedRun<S>>,
    model: &'static ModelDefinition,
    count: usize,
    preset: Preset,
) -> SeedFuture {
    Box::pin(async move {
        let mut rows = render_rows(&run, model, count).await?;

        let pending: Vec<_> = model
            .belongs_to()
            .filter(|r| !preset.iter().any(|(key, _)| *key == r.foreign_key))
            .collect();

        if run.reuse_parents {
            for relation in pending {
                let sample = run
                    .samples
                    .get(&(model.name, relation.foreign_key))
                    .filter(|sample| !sample.is_empty())
                    .ok_or_else(|| SeedError::NoParentRows {
                        model: model.name.to_string(),
                        parent: relation.model.to_string(),
                    })?;
                let mut rng = run.child_rng();
                for row in &mut rows {
                    if let Some(id) = sample.choose(&mut rng) {
                        row.insert(relation.foreign_key, id.clone());
                    }
                }
            }
        } else {
            let mut parents = JoinSet::new();
            for relation in pending {
                let parent = registered(relation.model)?;
                let run = run.clone();
                let foreign_key = relation.foreign_key;
                parents.spawn(async move {
                    insert_records(run, parent, count, Vec::new())
                        .await
                        .map(|ids| (foreign_key, ids))
                });
            }
            while let Some(joined) = parents.join_next().await {
                let (foreign_key, ids) = joined??;
                for (row, id) in rows.iter_mut().zip(ids) {
                    row.insert(foreign_key, id);
                }
            }
        }

        for (column, values) in preset {
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(column, value);
            }
        }

        let ids = run.store.insert_rows(model, rows).await?;
        run.record(model.name, ids.len());
        debug!(model = model.name, inserted = ids.len(), "Records inserted");
        Ok(ids)
    })
}

/// Render every template of `model` `count` times
async fn render_rows<S>(
    run: &SeedRun<S>,
    model: &'static ModelDefinition,
    count: usize,
) -> Result<Vec<SeedRow>, SeedError> {
    let compiled = run
        .compiled
        .get(model.name)
        .ok_or_else(|| SeedError::UnknownModel(model.name.to_string()))?;

    let mut rendered: Vec<Vec<(&'static PropertyDef, String)>> = Vec::with_capacity(count);
    {
        let mut rng = run.child_rng();
        for _ in 0..count {
            rendered.push(
                compiled
                    .fields
                    .iter()
                    .map(|(property, template)| (*property, template.render(&mut rng)))
                    .collect(),
            );
        }
    }

    let mut rows = Vec::with_capacity(count);
    for fields in rendered {
        let mut row = SeedRow::new();
        for (property, text) in fields {
            let value = coerce(model, property, text).await?;
            row.insert(property.column, value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Convert rendered text into the column's type
async fn coerce(
    model: &ModelDefinition,
    property: &PropertyDef,
    text: String,
) -> Result<SeedValue, SeedError> {
    let invalid = |text: &str, expected: &'static str| SeedError::Coerce {
        model: model.name.to_string(),
        property: property.name.to_string(),
        value: text.to_string(),
        expected,
    };
    let trimmed = text.trim();

    Ok(match property.kind {
        ColumnKind::Text => SeedValue::Text(text),
        ColumnKind::Integer => SeedValue::Int(
            trimmed
                .parse()
                .map_err(|_| invalid(trimmed, "integer"))?,
        ),
        ColumnKind::Decimal => SeedValue::Decimal(
            Decimal::from_str(trimmed).map_err(|_| invalid(trimmed, "decimal"))?,
        ),
        ColumnKind::Boolean => SeedValue::Bool(
            trimmed
                .parse()
                .map_err(|_| invalid(trimmed, "boolean"))?,
        ),
        ColumnKind::Uuid => {
            SeedValue::Uuid(Uuid::parse_str(trimmed).map_err(|_| invalid(trimmed, "uuid"))?)
        }
        ColumnKind::CustomerType => match trimmed.parse::<UserType>() {
            Ok(user_type) if user_type.is_customer() => {
                SeedValue::Text(user_type.as_str().to_string())
            }
            _ => return Err(invalid(trimmed, "customer type (REGULAR or PREMIUM)")),
        },
        ColumnKind::Password => SeedValue::Text(
            PasswordService::hash_async(text)
                .await
                .map_err(|e| SeedError::Hash(e.to_string()))?,
        ),
    })
}
