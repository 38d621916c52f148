use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound for configurable room dimensions (rows and columns).
pub const MAX_ROOM_DIM: i64 = 10;
pub const DEFAULT_RATING: i64 = 3;
pub const FALLBACK_COLOR: &str = "#CCCCCC";

/// Behavioral category shown as the seat marker color. Unknown labels are
/// preserved so an old snapshot round-trips; they render with the
/// fallback color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Participative,
    Reserved,
    NeedsSupport,
    Other(String),
}

impl Category {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Participative" => Category::Participative,
            "Reserved" => Category::Reserved,
            "NeedsSupport" => Category::NeedsSupport,
            other => Category::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Participative => "Participative",
            Category::Reserved => "Reserved",
            Category::NeedsSupport => "NeedsSupport",
            Category::Other(raw) => raw,
        }
    }

    /// Fixed category -> color lookup; anything unknown gets the
    /// fallback gray.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Participative => "#00CC96",
            Category::Reserved => "#636EFA",
            Category::NeedsSupport => "#EF553B",
            Category::Other(_) => FALLBACK_COLOR,
        }
    }

    pub fn known() -> [Category; 3] {
        [
            Category::Participative,
            Category::Reserved,
            Category::NeedsSupport,
        ]
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Category::from_label(&label))
    }
}

/// Fixed pick-list of note tags. Unlike categories, unknown labels
/// collapse to `Other` since every UI surface offers a closed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTag {
    None,
    Asd,
    HighAbilities,
    LearningDisability,
    Adhd,
    LowVision,
    Deafness,
    Other,
}

impl NoteTag {
    pub fn from_label(label: &str) -> Self {
        match label {
            "None" => NoteTag::None,
            "ASD" => NoteTag::Asd,
            "HighAbilities" => NoteTag::HighAbilities,
            "LearningDisability" => NoteTag::LearningDisability,
            "ADHD" => NoteTag::Adhd,
            "LowVision" => NoteTag::LowVision,
            "Deafness" => NoteTag::Deafness,
            _ => NoteTag::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NoteTag::None => "None",
            NoteTag::Asd => "ASD",
            NoteTag::HighAbilities => "HighAbilities",
            NoteTag::LearningDisability => "LearningDisability",
            NoteTag::Adhd => "ADHD",
            NoteTag::LowVision => "LowVision",
            NoteTag::Deafness => "Deafness",
            NoteTag::Other => "Other",
        }
    }
}

impl Serialize for NoteTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for NoteTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(NoteTag::from_label(&label))
    }
}

/// One roster row. Positional index within the roster is the identity
/// used for edits; duplicate (row, column) seats are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_seat")]
    pub row: i64,
    #[serde(default = "default_seat")]
    pub column: i64,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default = "default_note")]
    pub notes: NoteTag,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default = "default_rating")]
    pub rating: i64,
    #[serde(default)]
    pub photo: Option<String>,
}

fn default_seat() -> i64 {
    1
}

fn default_category() -> Category {
    Category::Reserved
}

fn default_note() -> NoteTag {
    NoteTag::None
}

fn default_rating() -> i64 {
    DEFAULT_RATING
}

pub type Roster = Vec<StudentRecord>;

/// Configured room size; seats run 1..=rows and 1..=columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    pub rows: i64,
    pub columns: i64,
}

impl RoomConfig {
    pub fn clamped(rows: i64, columns: i64) -> Self {
        RoomConfig {
            rows: rows.clamp(1, MAX_ROOM_DIM),
            columns: columns.clamp(1, MAX_ROOM_DIM),
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfig {
            rows: MAX_ROOM_DIM,
            columns: MAX_ROOM_DIM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSetError {
    EmptyName,
    AlreadyExists,
    NotFound,
    LastClass,
}

impl ClassSetError {
    pub fn code(&self) -> &'static str {
        match self {
            ClassSetError::EmptyName => "bad_params",
            ClassSetError::AlreadyExists => "already_exists",
            ClassSetError::NotFound => "not_found",
            ClassSetError::LastClass => "last_class",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ClassSetError::EmptyName => "class name must not be empty",
            ClassSetError::AlreadyExists => "a class with that name already exists",
            ClassSetError::NotFound => "class not found",
            ClassSetError::LastClass => "cannot delete the only remaining class",
        }
    }
}

/// All session state: named rosters, the current class, and the room
/// size. Invariants: never empty; `current` always names an existing
/// class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSet {
    pub classes: BTreeMap<String, Roster>,
    pub current: String,
    pub room: RoomConfig,
}

impl ClassSet {
    /// Starter state used when no snapshot exists yet.
    pub fn seeded() -> Self {
        let roster = vec![
            StudentRecord {
                name: "João".to_string(),
                row: 1,
                column: 1,
                category: Category::Participative,
                notes: NoteTag::Adhd,
                color: "#4285F4".to_string(),
                score: 0.0,
                rating: 3,
                photo: None,
            },
            StudentRecord {
                name: "Maria".to_string(),
                row: 1,
                column: 2,
                category: Category::Reserved,
                notes: NoteTag::None,
                color: "#EA4335".to_string(),
                score: 0.0,
                rating: 4,
                photo: None,
            },
        ];
        let mut classes = BTreeMap::new();
        classes.insert("Turma 1".to_string(), roster);
        ClassSet {
            classes,
            current: "Turma 1".to_string(),
            room: RoomConfig::default(),
        }
    }

    pub fn current_roster(&self) -> &Roster {
        // The invariant guarantees `current` exists; fall back to an
        // empty slice only if a caller broke it.
        static EMPTY: Vec<StudentRecord> = Vec::new();
        self.classes.get(&self.current).unwrap_or(&EMPTY)
    }

    pub fn current_roster_mut(&mut self) -> &mut Roster {
        self.classes.entry(self.current.clone()).or_default()
    }

    pub fn create_class(&mut self, name: &str) -> Result<(), ClassSetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClassSetError::EmptyName);
        }
        if self.classes.contains_key(name) {
            return Err(ClassSetError::AlreadyExists);
        }
        self.classes.insert(name.to_string(), Vec::new());
        self.current = name.to_string();
        Ok(())
    }

    pub fn select_class(&mut self, name: &str) -> Result<(), ClassSetError> {
        if !self.classes.contains_key(name) {
            return Err(ClassSetError::NotFound);
        }
        self.current = name.to_string();
        Ok(())
    }

    /// Deleting the only remaining class is rejected; after a successful
    /// delete the current class falls back to the first remaining one.
    pub fn delete_class(&mut self, name: &str) -> Result<(), ClassSetError> {
        if !self.classes.contains_key(name) {
            return Err(ClassSetError::NotFound);
        }
        if self.classes.len() == 1 {
            return Err(ClassSetError::LastClass);
        }
        self.classes.remove(name);
        if self.current == name {
            if let Some(first) = self.classes.keys().next() {
                self.current = first.clone();
            }
        }
        Ok(())
    }

    pub fn reset_current(&mut self) {
        self.current_roster_mut().clear();
    }
}
