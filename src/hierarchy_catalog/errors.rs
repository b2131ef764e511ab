use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("catalog file '{0}' has an unsupported extension (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
    #[error("hierarchy '{0}' is not defined in the catalog")]
    UnknownHierarchy(String),
}
