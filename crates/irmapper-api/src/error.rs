use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("Light name must not be empty")]
    EmptyName,

    #[error("[{0}] unique_id must not be empty")]
    EmptyUniqueId(String),

    #[error("[{light}] {entity_id:?} is not a valid remote entity id")]
    InvalidEntityId { light: String, entity_id: String },

    #[error("[{light}] IR code {key} must not be empty")]
    EmptyCode { light: String, key: String },

    #[error("Duplicate light id {0:?}")]
    DuplicateId(String),
}

pub type ValidationResult<T> = Result<T, ConfigValidationError>;
