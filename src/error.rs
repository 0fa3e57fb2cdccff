use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReunionError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("Unknown age group: {value} (expected ADULT, CHILD or INFANT)")]
    InvalidAgeGroup { value: String },

    #[error("{entity_type} not found with id: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Cannot move member {member_id} under {new_parent_id}: it is the member itself or one of its descendants")]
    CycleDetected {
        member_id: String,
        new_parent_id: String,
    },

    #[error("Member {member_id} is at generation {generation}; no generation fits below it")]
    GenerationOverflow { member_id: String, generation: u32 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl ReunionError {
    pub fn member_not_found(id: impl ToString) -> Self {
        ReunionError::NotFound {
            entity_type: "Family member".into(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReunionError::NotFound { .. })
    }
}

pub type ReunionResult<T> = Result<T, ReunionError>;
