use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sticky note pinned on the shared board. Position and size are pixel
/// coordinates on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub color: NoteColor,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(content: impl Into<String>, color: NoteColor, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: None,
            content: content.into(),
            color,
            x: 0,
            y: 0,
            width: NOTE_WIDTH,
            height: NOTE_HEIGHT,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

pub const NOTE_WIDTH: i32 = 200;
pub const NOTE_HEIGHT: i32 = 200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NoteColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Pink,
    Orange,
    Purple,
    Red,
    Cyan,
}

impl NoteColor {
    pub const ALL: [NoteColor; 8] = [
        NoteColor::Yellow,
        NoteColor::Blue,
        NoteColor::Green,
        NoteColor::Pink,
        NoteColor::Orange,
        NoteColor::Purple,
        NoteColor::Red,
        NoteColor::Cyan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NoteColor::Yellow => "yellow",
            NoteColor::Blue => "blue",
            NoteColor::Green => "green",
            NoteColor::Pink => "pink",
            NoteColor::Orange => "orange",
            NoteColor::Purple => "purple",
            NoteColor::Red => "red",
            NoteColor::Cyan => "cyan",
        }
    }
}
