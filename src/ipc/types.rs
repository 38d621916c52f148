use std::path::PathBuf;

use serde::Deserialize;

use crate::model::ClassSet;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Session state threaded through every handler: the selected workspace
/// directory and the class set loaded from (or seeded into) it.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub classes: Option<ClassSet>,
}
