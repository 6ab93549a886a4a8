#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read configuration file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("failed to serialize case record: {0}")]
    Serialization(serde_json::Error),
    #[error("case generation failed: {0}")]
    Generation(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
