use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TaskId;

/// Why a controller operation left state untouched. These are expected user
/// behavior, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "reason", content = "task_id", rename_all = "snake_case")]
pub enum IgnoreReason {
    #[error("title is empty")]
    EmptyTitle,
    #[error("no task with id {0}")]
    NotFound(TaskId),
    #[error("no edit in progress")]
    NoActiveEdit,
    #[error("no task ids left")]
    IdsExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter '{0}' (expected all, active or completed)")]
pub struct ParseFilterError(pub String);
