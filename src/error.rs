use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoopDbError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    Io,
}

#[derive(Debug, Error)]
pub enum LoopDbError {
    #[error("invalid base '{base}' at offset {offset} in {entity}")]
    InvalidBase {
        entity: String,
        base: char,
        offset: usize,
    },

    #[error("part '{part}' has no resolvable backbone")]
    MissingBackbone { part: String },

    #[error("cycle detected at part '{part}' (path: {path})")]
    CycleDetected { part: String, path: String },

    #[error("parent part '{parent}' has more than one child at position {position}")]
    DuplicatePosition { parent: String, position: i64 },

    #[error("leaf part '{part}' has no sequence")]
    UndefinedSequence { part: String },

    #[error("assembled sequence of {entity} contains '{base}' at offset {offset}")]
    InvalidAlphabet {
        entity: String,
        base: char,
        offset: usize,
    },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} id '{id}' is already in use")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} name '{name}' is not unique")]
    DuplicateName { kind: &'static str, name: String },

    #[error("feature '{label}' of {entity} spans {start}..{end} outside 0..{len}")]
    FeatureOutOfBounds {
        entity: String,
        label: String,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LoopDbError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoopDbError::NotFound { .. } => ErrorCode::NotFound,
            LoopDbError::Io(_) => ErrorCode::Io,
            LoopDbError::Serde(e) if e.is_io() => ErrorCode::Io,
            _ => ErrorCode::InvalidInput,
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        LoopDbError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn missing_backbone(part: impl Into<String>) -> Self {
        LoopDbError::MissingBackbone { part: part.into() }
    }
}
