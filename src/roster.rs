//! Roster normalization and seat-click resolution.
//!
//! Snapshots written by older builds may miss whole columns or carry
//! malformed values. Loading never fails: every field is coerced through
//! an explicit `coerce_or_default` helper, so the repair policy is
//! visible here instead of being scattered across call sites.

use serde_json::Value;

use crate::model::{Category, NoteTag, Roster, StudentRecord, DEFAULT_RATING};

/// Normalize a raw JSON roster (an array of objects) into typed records.
/// Non-array input normalizes to the empty roster. Idempotent: feeding
/// the serialized result back in reproduces it exactly.
pub fn normalize_roster(raw: &Value) -> Roster {
    raw.as_array()
        .map(|rows| rows.iter().map(normalize_record).collect())
        .unwrap_or_default()
}

pub fn normalize_record(raw: &Value) -> StudentRecord {
    let category = coerce_category(raw.get("category"));
    let color = coerce_color(raw.get("color"), &category);
    StudentRecord {
        name: coerce_text(raw.get("name")),
        row: coerce_seat(raw.get("row")),
        column: coerce_seat(raw.get("column")),
        notes: coerce_notes(raw.get("notes")),
        score: coerce_score(raw.get("score")),
        rating: coerce_rating(raw.get("rating")),
        photo: coerce_photo(raw.get("photo")),
        category,
        color,
    }
}

/// Exact-match seat click: every record at (row, column) gets
/// `clamp(point_index + 1, 1, 5)` as its new rating. Returns the rating
/// written, or `None` when the seat is empty (roster untouched).
pub fn resolve_seat_click(
    roster: &mut [StudentRecord],
    row: i64,
    column: i64,
    point_index: i64,
) -> Option<i64> {
    let rating = (point_index + 1).clamp(1, 5);
    let mut hit = false;
    for record in roster
        .iter_mut()
        .filter(|r| r.row == row && r.column == column)
    {
        record.rating = rating;
        hit = true;
    }
    hit.then_some(rating)
}

fn coerce_number(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_text(raw: Option<&Value>) -> String {
    raw.and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Seats are floored at 1 but deliberately not clamped at the top:
/// the chart builder skips out-of-room seats, and the student reappears
/// when the room is enlarged.
fn coerce_seat(raw: Option<&Value>) -> i64 {
    match coerce_number(raw) {
        Some(n) if n.is_finite() => (n as i64).max(1),
        _ => 1,
    }
}

/// Rating repair: numeric coercion (truncating fractions), substitute 3
/// for null/non-numeric/non-finite input, then clamp into [1, 5]. The
/// stored value is always an integer.
pub fn coerce_rating(raw: Option<&Value>) -> i64 {
    match coerce_number(raw) {
        Some(n) if n.is_finite() => (n as i64).clamp(1, 5),
        _ => DEFAULT_RATING,
    }
}

fn coerce_score(raw: Option<&Value>) -> f64 {
    match coerce_number(raw) {
        Some(n) if n.is_finite() => n.clamp(0.0, 10.0),
        _ => 0.0,
    }
}

fn coerce_category(raw: Option<&Value>) -> Category {
    match raw.and_then(Value::as_str) {
        Some(label) if !label.trim().is_empty() => Category::from_label(label),
        _ => Category::Reserved,
    }
}

fn coerce_notes(raw: Option<&Value>) -> NoteTag {
    match raw.and_then(Value::as_str) {
        Some(label) => NoteTag::from_label(label),
        None => NoteTag::None,
    }
}

fn coerce_color(raw: Option<&Value>, category: &Category) -> String {
    match raw.and_then(Value::as_str) {
        Some(color) if !color.trim().is_empty() => color.to_string(),
        _ => category.color().to_string(),
    }
}

fn coerce_photo(raw: Option<&Value>) -> Option<String> {
    match raw {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
