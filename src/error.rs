//! Error taxonomy.
//!
//! `LootError` never escapes the public generate calls; the orchestrator
//! degrades to a fallback instead. `ConfigError` and `CatalogError` are
//! returned to the host during setup.

#[derive(Debug, thiserror::Error)]
pub enum LootError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Unknown monster: {0}")]
    UnknownMonster(String),

    #[error("Unknown area: {0}")]
    UnknownArea(String),

    #[error("No candidates for {0}")]
    EmptyPool(String),

    #[error("Invalid level: {0}")]
    InvalidLevel(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config extension: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate id in {table}: {id}")]
    DuplicateId { table: &'static str, id: String },
}
