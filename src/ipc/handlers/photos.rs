use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_index, get_required_str, persist, require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::photo;

/// Attach an uploaded photo to the student at a roster index. The upload
/// is thumbnailed before storage; an undecodable upload is rejected and
/// the roster stays as it was.
fn photos_set(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let index = get_required_index(params, "index")?;
    let upload = get_required_str(params, "imageBase64")?;

    let (workspace, classes) = require_session(state)?;
    if classes.current_roster().get(index).is_none() {
        return Err(HandlerErr::new("not_found", "no student at that index"));
    }

    let thumb = photo::thumbnail_from_base64(&upload)
        .map_err(|e| HandlerErr::new("bad_image", format!("{e:#}")))?;
    classes.current_roster_mut()[index].photo = Some(thumb);
    persist(&workspace, classes)?;
    Ok(json!({ "index": index }))
}

fn photos_clear(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let index = get_required_index(params, "index")?;
    let (workspace, classes) = require_session(state)?;
    let roster = classes.current_roster_mut();
    let Some(record) = roster.get_mut(index) else {
        return Err(HandlerErr::new("not_found", "no student at that index"));
    };
    record.photo = None;
    persist(&workspace, classes)?;
    Ok(json!({ "index": index }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "photos.set" => photos_set(state, &req.params),
        "photos.clear" => photos_clear(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
