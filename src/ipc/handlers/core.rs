use serde_json::json;
use std::path::PathBuf;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{persist, require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::RoomConfig;
use crate::store;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    let classes = match store::load_or_seed(&path) {
        Ok(classes) => classes,
        Err(e) => {
            let code = if e.downcast_ref::<serde_json::Error>().is_some() {
                "snapshot_corrupt"
            } else {
                "snapshot_load_failed"
            };
            return err(&req.id, code, format!("{e:#}"), None);
        }
    };

    // Flush immediately so a fresh workspace gets its seed file and a
    // repaired legacy snapshot lands on disk in normalized form.
    if let Err(e) = store::save(&path, &classes) {
        return err(&req.id, "snapshot_write_failed", e.to_string(), None);
    }

    state.workspace = Some(path.clone());
    state.classes = Some(classes);
    ok(
        &req.id,
        json!({ "workspacePath": path.to_string_lossy() }),
    )
}

fn room_configure(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let (workspace, classes) = require_session(state)?;
    let rows = params
        .get("rows")
        .and_then(|v| v.as_i64())
        .unwrap_or(classes.room.rows);
    let columns = params
        .get("columns")
        .and_then(|v| v.as_i64())
        .unwrap_or(classes.room.columns);
    classes.room = RoomConfig::clamped(rows, columns);
    persist(&workspace, classes)?;
    Ok(json!({ "room": classes.room }))
}

fn handle_room_configure(state: &mut AppState, req: &Request) -> serde_json::Value {
    match room_configure(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "room.configure" => Some(handle_room_configure(state, req)),
        _ => None,
    }
}
