//! Snapshot persistence: one flat JSON file per workspace, rewritten
//! whole on every mutation. Loading is lenient — older or partially
//! written snapshots pass through the roster normalizer instead of
//! failing — but a file that is not JSON at all is reported and left
//! untouched.

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::model::{ClassSet, RoomConfig, MAX_ROOM_DIM};
use crate::roster::normalize_roster;

pub const SNAPSHOT_FILE: &str = "seatmap.json";
pub const SNAPSHOT_FORMAT: &str = "seatmap-snapshot-v1";

pub fn snapshot_path(workspace: &Path) -> PathBuf {
    workspace.join(SNAPSHOT_FILE)
}

/// Load the workspace snapshot, or seed a fresh class set when the
/// workspace has none yet. Creates the workspace directory if needed.
pub fn load_or_seed(workspace: &Path) -> anyhow::Result<ClassSet> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })?;

    let path = snapshot_path(workspace);
    if !path.is_file() {
        return Ok(ClassSet::seeded());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read snapshot {}", path.to_string_lossy()))?;
    let raw: Value = serde_json::from_str(&text).context("snapshot is not valid JSON")?;
    Ok(from_raw(&raw))
}

/// Repair an arbitrary snapshot document into a valid class set. Every
/// roster runs through the normalizer; empty class names are dropped; a
/// missing or dangling `current` falls back to the first class; an empty
/// class map falls back to the seed.
fn from_raw(raw: &Value) -> ClassSet {
    let room = coerce_room(raw.get("room"));

    let mut classes = BTreeMap::new();
    if let Some(map) = raw.get("classes").and_then(Value::as_object) {
        for (name, roster) in map {
            if name.trim().is_empty() {
                continue;
            }
            classes.insert(name.clone(), normalize_roster(roster));
        }
    }
    if classes.is_empty() {
        let mut seeded = ClassSet::seeded();
        seeded.room = room;
        return seeded;
    }

    let current = raw
        .get("current")
        .and_then(Value::as_str)
        .filter(|name| classes.contains_key(*name))
        .map(str::to_string)
        .or_else(|| classes.keys().next().cloned())
        .unwrap_or_default();

    ClassSet {
        classes,
        current,
        room,
    }
}

fn coerce_room(raw: Option<&Value>) -> RoomConfig {
    let dim = |key: &str| {
        raw.and_then(|r| r.get(key))
            .and_then(Value::as_i64)
            .unwrap_or(MAX_ROOM_DIM)
    };
    RoomConfig::clamped(dim("rows"), dim("columns"))
}

/// Whole-file overwrite: serialize next to the target, then swap it in.
pub fn save(workspace: &Path, set: &ClassSet) -> anyhow::Result<()> {
    let path = snapshot_path(workspace);
    let tmp = workspace.join(format!("{SNAPSHOT_FILE}.saving"));

    let doc = json!({
        "format": SNAPSHOT_FORMAT,
        "savedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "current": set.current,
        "room": set.room,
        "classes": set.classes,
    });
    let text = serde_json::to_string_pretty(&doc).context("failed to serialize snapshot")?;

    std::fs::write(&tmp, text)
        .with_context(|| format!("failed to write snapshot {}", tmp.to_string_lossy()))?;
    if path.exists() {
        std::fs::remove_file(&path).with_context(|| {
            format!(
                "failed to replace existing snapshot {}",
                path.to_string_lossy()
            )
        })?;
    }
    std::fs::rename(&tmp, &path).with_context(|| {
        format!("failed to move snapshot into place at {}", path.to_string_lossy())
    })?;
    Ok(())
}
