//! Room map model: everything the host UI needs to draw the classroom,
//! with no drawing here. Seats outside the configured room are skipped,
//! not errors.

use serde::Serialize;

use crate::model::{Category, RoomConfig, StudentRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartModel {
    pub room: RoomConfig,
    pub seats: Vec<Seat>,
    pub legend: Vec<LegendEntry>,
    pub students: Vec<SeatMarker>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub row: i64,
    pub column: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub category: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMarker {
    /// Positional index into the roster; the UI echoes it back on edits.
    pub index: usize,
    pub name: String,
    pub row: i64,
    pub column: i64,
    pub color: String,
    pub rating: i64,
    pub stars: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Star glyph line for a rating: filled stars up to the rating, hollow
/// for the rest of the five.
pub fn star_glyphs(rating: i64) -> String {
    let filled = rating.clamp(1, 5) as usize;
    let mut out = "★".repeat(filled);
    out.push_str(&"☆".repeat(5 - filled));
    out
}

pub fn build_chart_model(room: RoomConfig, roster: &[StudentRecord]) -> ChartModel {
    let mut seats = Vec::with_capacity((room.rows * room.columns) as usize);
    for row in 1..=room.rows {
        for column in 1..=room.columns {
            seats.push(Seat { row, column });
        }
    }

    let legend = Category::known()
        .iter()
        .map(|c| LegendEntry {
            category: c.label().to_string(),
            color: c.color().to_string(),
        })
        .collect();

    let students = roster
        .iter()
        .enumerate()
        .filter(|(_, r)| r.row <= room.rows && r.column <= room.columns)
        .map(|(index, r)| SeatMarker {
            index,
            name: r.name.clone(),
            row: r.row,
            column: r.column,
            color: effective_color(r),
            rating: r.rating,
            stars: star_glyphs(r.rating),
            photo: r.photo.clone(),
        })
        .collect();

    ChartModel {
        room,
        seats,
        legend,
        students,
    }
}

fn effective_color(record: &StudentRecord) -> String {
    if record.color.trim().is_empty() {
        record.category.color().to_string()
    } else {
        record.color.clone()
    }
}
