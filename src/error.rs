use thiserror::Error;
use uuid::Uuid;

/// Reasons the evaluator refuses to score a pair of transcripts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("invalid input: reference transcription has no tokens")]
    InvalidInput,
}

/// Failures of the reference-text collaborator.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("reference text not found: {0}")]
    NotFound(Uuid),

    #[error("failed to read reference text {id}: {source}")]
    Io {
        id: Uuid,
        #[source]
        source: std::io::Error,
    },

    #[error("text service request for {id} failed: {source}")]
    Upstream {
        id: Uuid,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed reference record {id}: {source}")]
    Malformed {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("alignment table of {cells} cells exceeds the limit of {limit}")]
    ResourceExhausted { cells: usize, limit: usize },
}

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}
