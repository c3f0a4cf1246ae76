//! Page geometry, positioned draw instructions and pagination.
//!
//! All coordinates here are page-relative and top-down: `y = 0` is the top
//! edge of the page and text is positioned by its baseline. The PDF writer
//! flips them into PDF user space.

mod context;
mod paginator;

pub use context::{Align, Column, LayoutContext, LeftToRight, RightToLeft, TextStyle, WritingSystem, writing_system};
pub use paginator::{Paginator, PaginatorState};

use crate::fonts::FontRole;
use crate::text::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const TEXT_MUTED: Color = Color([97, 97, 97]);
    pub const BANNER: Color = Color([25, 118, 210]);
    pub const TABLE_HEADER: Color = Color([33, 33, 33]);
    pub const ROW_STRIPE: Color = Color([245, 245, 245]);
    pub const TRACK: Color = Color([230, 230, 230]);
    pub const FILTER_BOX: Color = Color([255, 248, 225]);
    pub const RULE: Color = Color([189, 189, 189]);

    pub(crate) fn rgb_f32(self) -> (f32, f32, f32) {
        let [r, g, b] = self.0;
        (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

/// A run of text already in visual order, drawn left to right from `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    pub font: FontRole,
    pub size: f32,
    pub color: Color,
    /// Direction the source string resolved to (before reordering).
    pub direction: Direction,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawInstruction {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
    },
    Text(TextItem),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// 1-based; `None` until the final pass knows the page count.
    pub number: Option<usize>,
    pub instructions: Vec<DrawInstruction>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.instructions.iter().filter_map(|i| match i {
            DrawInstruction::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.text.contains(needle))
    }
}
