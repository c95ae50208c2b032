//! Template files on disk
//!
//! One `seed-<model>.json` file per registered model:
//!
//! ```json
//! { "model": "Routine", "properties": { "description": "{{lorem.sentence}}" } }
//! ```

use super::error::SeedError;
use super::registry::{ModelDefinition, PropertyDef, MODELS};
use super::template::Template;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Properties kept by `prepare` even when the model does not declare them
const PROTECTED_PROPERTIES: [&str; 2] = ["email", "password"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub model: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// What `prepare` did to one file
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareOutcome {
    pub model: &'static str,
    pub path: PathBuf,
    pub created: bool,
    pub added: Vec<String>,
    pub dropped: Vec<String>,
}

/// `DietFoodDetail` -> `seed-diet-food-detail.json`
pub fn file_name(model: &str) -> String {
    let mut kebab = String::with_capacity(model.len() + 4);
    for (i, ch) in model.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            kebab.push('-');
        }
        kebab.push(ch.to_ascii_lowercase());
    }
    format!("seed-{}.json", kebab)
}

/// Bring the template directory in line with the registry
pub async fn prepare(dir: &Path) -> Result<Vec<PrepareOutcome>, SeedError> {
    tokio::fs::create_dir_all(dir).await?;

    let mut outcomes = Vec::with_capacity(MODELS.len());
    for model in MODELS {
        let path = dir.join(file_name(model.name));
        let existing = read_file(&path).await?;
        let created = existing.is_none();

        let (file, added, dropped) = reconcile(model, existing.unwrap_or_default());
        let json = serde_json::to_string_pretty(&file)?;
        tokio::fs::write(&path, json + "\n").await?;

        debug!(model = model.name, ?added, ?dropped, "Template file written");
        outcomes.push(PrepareOutcome {
            model: model.name,
            path,
            created,
            added,
            dropped,
        });
    }

    info!(dir = %dir.display(), files = outcomes.len(), "Seed templates prepared");
    Ok(outcomes)
}

fn reconcile(
    model: &ModelDefinition,
    mut file: TemplateFile,
) -> (TemplateFile, Vec<String>, Vec<String>) {
    file.model = model.name.to_string();

    let dropped: Vec<String> = file
        .properties
        .keys()
        .filter(|key| {
            model.property(key).is_none() && !PROTECTED_PROPERTIES.contains(&key.as_str())
        })
        .cloned()
        .collect();
    for key in &dropped {
        file.properties.remove(key);
    }

    let mut added = Vec::new();
    for property in model.properties {
        if !file.properties.contains_key(property.name) {
            file.properties.insert(property.name.to_string(), String::new());
            added.push(property.name.to_string());
        }
    }

    (file, added, dropped)
}

async fn read_file(path: &Path) -> Result<Option<TemplateFile>, SeedError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// A model's templates, parsed and checked for completeness
#[derive(Debug)]
pub struct CompiledModel {
    pub model: &'static ModelDefinition,
    pub fields: Vec<(&'static PropertyDef, Template)>,
}

/// Template files loaded from a directory
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    dir: PathBuf,
    files: BTreeMap<String, TemplateFile>,
}

impl TemplateSet {
    /// Read every registered model's file that exists in `dir`
    pub async fn load(dir: &Path) -> Result<Self, SeedError> {
        let mut files = BTreeMap::new();
        for model in MODELS {
            if let Some(file) = read_file(&dir.join(file_name(model.name))).await? {
                files.insert(model.name.to_string(), file);
            }
        }
        debug!(dir = %dir.display(), loaded = files.len(), "Seed templates loaded");

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Build a set directly from in-memory files
    pub fn from_files(files: impl IntoIterator<Item = TemplateFile>) -> Self {
        Self {
            dir: PathBuf::new(),
            files: files.into_iter().map(|f| (f.model.clone(), f)).collect(),
        }
    }

    /// Parse the templates of every declared property of `model`
    pub fn compile(&self, model: &'static ModelDefinition) -> Result<CompiledModel, SeedError> {
        let file = self
            .files
            .get(model.name)
            .ok_or_else(|| SeedError::MissingTemplateFile {
                model: model.name.to_string(),
                path: self.dir.join(file_name(model.name)),
            })?;

        let mut fields = Vec::with_capacity(model.properties.len());
        for property in model.properties {
            let source = file
                .properties
                .get(property.name)
                .map(|s| s.trim())
                .unwrap_or_default();
            if source.is_empty() {
                return Err(SeedError::EmptyTemplate {
                    model: model.name.to_string(),
                    property: property.name.to_string(),
                });
            }

            let template = Template::parse(source).map_err(|source| SeedError::Template {
                model: model.name.to_string(),
                property: property.name.to_string(),
                source,
            })?;
            fields.push((property, template));
        }

        Ok(CompiledModel { model, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::registry::find_model;
    use rstest::rstest;

    fn routine_file(description: &str) -> TemplateFile {
        TemplateFile {
            model: "Routine".to_string(),
            properties: BTreeMap::from([("description".to_string(), description.to_string())]),
        }
    }

    #[rstest]
    #[case("Routine", "seed-routine.json")]
    #[case("DietFoodDetail", "seed-diet-food-detail.json")]
    #[case("BodyArea", "seed-body-area.json")]
    fn test_file_name(#[case] model: &str, #[case] expected: &str) {
        assert_eq!(file_name(model), expected);
    }

    #[tokio::test]
    async fn test_prepare_creates_a_file_per_model() {
        let dir = tempfile::tempdir().unwrap();

        let outcomes = prepare(dir.path()).await.unwrap();

        assert_eq!(outcomes.len(), MODELS.len());
        assert!(outcomes.iter().all(|o| o.created));

        let set = TemplateSet::load(dir.path()).await.unwrap();
        let routine = find_model("Routine").unwrap();
        assert!(matches!(
            set.compile(routine),
            Err(SeedError::EmptyTemplate { .. })
        ));
    }

    #[tokio::test]
    async fn test_prepare_keeps_filled_templates_and_drops_stale_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name("Diet"));
        let existing = TemplateFile {
            model: "Diet".to_string(),
            properties: BTreeMap::from([
                ("description".to_string(), "{{lorem.sentence}}".to_string()),
                ("calories".to_string(), "{{random.number(10)}}".to_string()),
                ("email".to_string(), "{{internet.email}}".to_string()),
            ]),
        };
        std::fs::write(&path, serde_json::to_string(&existing).unwrap()).unwrap();

        let outcomes = prepare(dir.path()).await.unwrap();
        let diet = outcomes.iter().find(|o| o.model == "Diet").unwrap();
        assert!(!diet.created);
        assert_eq!(diet.dropped, vec!["calories".to_string()]);
        assert!(diet.added.is_empty());

        let rewritten: TemplateFile =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten.properties["description"], "{{lorem.sentence}}");
        assert!(rewritten.properties.contains_key("email"));
        assert!(!rewritten.properties.contains_key("calories"));
    }

    #[tokio::test]
    async fn test_shipped_templates_compile() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("seeds");
        let set = TemplateSet::load(&dir).await.unwrap();

        for model in MODELS {
            set.compile(model)
                .unwrap_or_else(|e| panic!("{}: {}", model.name, e));
        }
    }

    #[test]
    fn test_compile_missing_file() {
        let set = TemplateSet::from_files([]);
        assert!(matches!(
            set.compile(find_model("Routine").unwrap()),
            Err(SeedError::MissingTemplateFile { .. })
        ));
    }

    #[test]
    fn test_compile_reports_bad_template() {
        let set = TemplateSet::from_files([routine_file("{{lorem.nope}}")]);
        let err = set.compile(find_model("Routine").unwrap()).unwrap_err();
        assert!(err.to_string().contains("Routine.description"));
    }

    #[test]
    fn test_compile_orders_fields_like_the_registry() {
        let set = TemplateSet::from_files([routine_file("Leg day {{random.number(9)}}")]);
        let compiled = set.compile(find_model("Routine").unwrap()).unwrap();

        assert_eq!(compiled.fields.len(), 1);
        assert_eq!(compiled.fields[0].0.column, "description");
    }
}
