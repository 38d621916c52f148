use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{bad_params, persist, require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::roster::normalize_record;

fn roster_json(roster: &crate::model::Roster) -> Result<serde_json::Value, HandlerErr> {
    serde_json::to_value(roster)
        .map_err(|e| HandlerErr::new("server_error", format!("failed to encode roster: {e}")))
}

fn roster_get(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let (_, classes) = require_session(state)?;
    Ok(json!({
        "class": classes.current,
        "students": roster_json(classes.current_roster())?,
    }))
}

/// Append one record built from the request params. Params are treated
/// as one raw roster row, so the same coercion rules apply as on load;
/// a missing color is derived from the category.
fn students_add(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let (workspace, classes) = require_session(state)?;
    let record = normalize_record(params);
    let roster = classes.current_roster_mut();
    roster.push(record);
    let index = roster.len() - 1;
    let student = serde_json::to_value(&roster[index])
        .map_err(|e| HandlerErr::new("server_error", format!("failed to encode student: {e}")))?;
    persist(&workspace, classes)?;
    Ok(json!({ "index": index, "student": student }))
}

/// Bulk save from the tabular editor. The editor works on a photo-less
/// view, so a row without a `photo` key inherits the photo of the record
/// previously at that index; a row that names a photo (or nulls it)
/// wins.
fn roster_save(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let rows = params
        .get("rows")
        .and_then(|v| v.as_array())
        .ok_or_else(|| bad_params("missing rows array"))?;

    let (workspace, classes) = require_session(state)?;
    let previous = classes.current_roster().clone();
    let mut next: crate::model::Roster = rows.iter().map(normalize_record).collect();
    for (index, (record, raw)) in next.iter_mut().zip(rows).enumerate() {
        if raw.get("photo").is_none() {
            record.photo = previous.get(index).and_then(|p| p.photo.clone());
        }
    }

    *classes.current_roster_mut() = next;
    persist(&workspace, classes)?;
    Ok(json!({
        "class": classes.current,
        "studentCount": classes.current_roster().len(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "roster.get" => roster_get(state),
        "students.add" => students_add(state, &req.params),
        "roster.save" => roster_save(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
