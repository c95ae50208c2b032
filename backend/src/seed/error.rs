use super::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("unknown model `{0}`")]
    UnknownModel(String),

    #[error("record count must be positive, got {0}")]
    InvalidCount(i64),

    #[error("no template file for model `{model}` (expected {path})")]
    MissingTemplateFile { model: String, path: PathBuf },

    #[error("template for `{model}.{property}` is empty; run `prepare` and fill it in")]
    EmptyTemplate { model: String, property: String },

    #[error("template for `{model}.{property}` is invalid: {source}")]
    Template {
        model: String,
        property: String,
        #[source]
        source: TemplateError,
    },

    #[error("`{model}.{property}` rendered `{value}`, which is not a valid {expected}")]
    Coerce {
        model: String,
        property: String,
        value: String,
        expected: &'static str,
    },

    #[error("There are not {parent} existing records to make the relation insert for {model}")]
    NoParentRows { model: String, parent: String },

    #[error("rows for `{0}` do not share the same columns")]
    RaggedRows(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("seed task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("template file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
