//! Report sections, drawn top to bottom in a fixed order. Each renderer
//! advances the layout cursor and returns where it ended.

pub mod breakdown;
pub mod filters;
pub mod footer;
pub mod header;
pub mod table;

pub use breakdown::{BreakdownEntry, breakdown};

use crate::layout::{LayoutContext, TextStyle};

/// Vertical space after each section.
pub(crate) const SECTION_GAP: f32 = 15.0;

pub(crate) fn heading_height(ctx: &LayoutContext) -> f32 {
    ctx.config().heading_font_size + 10.0
}

/// Bold section heading on the writing direction's start edge.
pub(crate) fn heading(ctx: &mut LayoutContext, text: &str) -> f32 {
    let style = TextStyle::new(ctx.config().heading_font_size).bold();
    let height = heading_height(ctx);
    ctx.paragraph_line(text, style, height)
}
