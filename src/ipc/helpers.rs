//! Shared plumbing for handler modules: the typed handler error, param
//! extraction, and the persist-after-mutation step.

use serde_json::json;
use std::path::{Path, PathBuf};

use super::error::err;
use super::types::AppState;
use crate::model::{ClassSet, ClassSetError};
use crate::store;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        HandlerErr {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<ClassSetError> for HandlerErr {
    fn from(e: ClassSetError) -> Self {
        HandlerErr::new(e.code(), e.message())
    }
}

pub fn bad_params(message: impl Into<String>) -> HandlerErr {
    HandlerErr::new("bad_params", message)
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| bad_params(format!("missing {}", key)))
}

pub fn get_required_index(params: &serde_json::Value, key: &str) -> Result<usize, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .ok_or_else(|| bad_params(format!("missing {}", key)))
}

/// Both halves of the session, or `no_workspace`. The workspace path is
/// cloned so the class set can be borrowed mutably alongside it.
pub fn require_session(state: &mut AppState) -> Result<(PathBuf, &mut ClassSet), HandlerErr> {
    let Some(workspace) = state.workspace.clone() else {
        return Err(HandlerErr::new("no_workspace", "select a workspace first"));
    };
    let Some(classes) = state.classes.as_mut() else {
        return Err(HandlerErr::new("no_workspace", "select a workspace first"));
    };
    Ok((workspace, classes))
}

/// Whole-snapshot overwrite after a mutation; every mutating handler
/// calls this before replying.
pub fn persist(workspace: &Path, classes: &ClassSet) -> Result<(), HandlerErr> {
    store::save(workspace, classes).map_err(|e| HandlerErr {
        code: "snapshot_write_failed",
        message: e.to_string(),
        details: Some(json!({ "file": store::SNAPSHOT_FILE })),
    })
}
