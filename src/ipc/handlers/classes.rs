use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, persist, require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};

fn classes_list(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let (_, classes) = require_session(state)?;
    let rows: Vec<serde_json::Value> = classes
        .classes
        .iter()
        .map(|(name, roster)| {
            json!({
                "name": name,
                "studentCount": roster.len(),
                "isCurrent": *name == classes.current,
            })
        })
        .collect();
    Ok(json!({ "classes": rows, "current": classes.current }))
}

fn classes_create(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let (workspace, classes) = require_session(state)?;
    classes.create_class(&name)?;
    persist(&workspace, classes)?;
    Ok(json!({ "name": classes.current, "current": classes.current }))
}

fn classes_select(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let (workspace, classes) = require_session(state)?;
    classes.select_class(&name)?;
    persist(&workspace, classes)?;
    Ok(json!({ "current": classes.current }))
}

/// Delete by name, defaulting to the current class. Removing the only
/// remaining class is rejected and leaves the set untouched.
fn classes_delete(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let (workspace, classes) = require_session(state)?;
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(&classes.current)
        .to_string();
    classes.delete_class(&name)?;
    persist(&workspace, classes)?;
    Ok(json!({ "deleted": name, "current": classes.current }))
}

fn classes_reset(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let (workspace, classes) = require_session(state)?;
    classes.reset_current();
    persist(&workspace, classes)?;
    Ok(json!({ "current": classes.current, "studentCount": 0 }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "classes.list" => classes_list(state),
        "classes.create" => classes_create(state, &req.params),
        "classes.select" => classes_select(state, &req.params),
        "classes.delete" => classes_delete(state, &req.params),
        "classes.reset" => classes_reset(state),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
