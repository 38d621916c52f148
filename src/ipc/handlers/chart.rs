use serde_json::json;

use crate::chart::build_chart_model;
use crate::ipc::error::ok;
use crate::ipc::helpers::{bad_params, persist, require_session, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::roster::resolve_seat_click;

fn chart_model(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let (_, classes) = require_session(state)?;
    let model = build_chart_model(classes.room, classes.current_roster());
    serde_json::to_value(model)
        .map_err(|e| HandlerErr::new("server_error", format!("failed to encode chart: {e}")))
}

/// Seat coordinates arrive from the plot surface as numbers; matching is
/// exact integer equality, so a fractional coordinate can never hit a
/// seat and resolves to an unchanged roster.
fn coord(params: &serde_json::Value, key: &str) -> Result<Option<i64>, HandlerErr> {
    let value = params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| bad_params(format!("missing {}", key)))?;
    if value.fract() == 0.0 {
        Ok(Some(value as i64))
    } else {
        Ok(None)
    }
}

fn chart_click(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let row = coord(params, "row")?;
    let column = coord(params, "column")?;
    let point_index = params
        .get("pointIndex")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
        .ok_or_else(|| bad_params("missing pointIndex"))?;

    let (workspace, classes) = require_session(state)?;
    let (Some(row), Some(column)) = (row, column) else {
        return Ok(json!({ "changed": false }));
    };

    match resolve_seat_click(classes.current_roster_mut(), row, column, point_index) {
        Some(rating) => {
            persist(&workspace, classes)?;
            Ok(json!({ "changed": true, "rating": rating }))
        }
        None => Ok(json!({ "changed": false })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "chart.model" => chart_model(state),
        "chart.click" => chart_click(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    })
}
