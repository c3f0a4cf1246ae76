//! Script detection and RTL text preparation.
//!
//! Strings are classified per string, not per document: an English report can
//! still contain an Arabic name, and that cell is shaped and right-aligned on
//! its own.

pub mod bidi;
pub mod script;
pub mod shaping;

pub use script::is_right_to_left;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn of(text: &str) -> Self {
        if is_right_to_left(text) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }
}

/// Reshape Arabic letters into their joined forms, then reorder the result
/// into left-to-right drawing order. Only meaningful for RTL strings.
pub fn to_visual_order(text: &str) -> String {
    let shaped = shaping::reshape(text);
    bidi::reorder(&shaped, Direction::Rtl)
}

/// Text ready to be drawn left to right, plus the direction it was resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedText {
    pub visual: String,
    pub direction: Direction,
}

pub fn prepare(text: &str) -> PreparedText {
    match Direction::of(text) {
        Direction::Rtl => PreparedText {
            visual: to_visual_order(text),
            direction: Direction::Rtl,
        },
        Direction::Ltr => PreparedText {
            visual: text.to_string(),
            direction: Direction::Ltr,
        },
    }
}
