use crate::i18n::Labels;
use crate::layout::{Color, LayoutContext, TextStyle};
use crate::model::ReportFilters;
use crate::sanitize::{FieldKind, sanitize};

use super::{SECTION_GAP, heading_height};

const LINE_HEIGHT: f32 = 16.0;
const PADDING: f32 = 8.0;

/// Active-filter summary box. Contributes no height when no filter is set.
pub fn render(ctx: &mut LayoutContext, labels: &Labels, filters: &ReportFilters) -> f32 {
    if !filters.is_active() {
        return ctx.cursor();
    }

    let mut lines = Vec::new();
    if let Some(answer) = &filters.answer {
        let value = sanitize(labels.answer(answer), FieldKind::FreeText);
        lines.push(format!("{}: {value}", labels.filter_answer));
    }
    if let Some(term) = filters.search.as_deref() {
        let term = sanitize(term, FieldKind::SearchLabel);
        if !term.is_empty() {
            lines.push(format!("{}: \"{term}\"", labels.filter_search));
        }
    }

    let title_height = heading_height(ctx);
    let box_height = PADDING * 2.0 + title_height + lines.len() as f32 * LINE_HEIGHT;
    ctx.ensure_room(box_height);

    let width = ctx.content_width();
    ctx.fill_rect(ctx.box_x(0.0, width), 0.0, width, box_height, Color::FILTER_BOX);

    let inner = width - PADDING * 2.0;
    let x = ctx.box_x(PADDING, inner);
    let align = ctx.writing().align();
    let title = TextStyle::new(ctx.config().heading_font_size).bold();
    ctx.text(labels.filters_heading, title, x, inner, align, PADDING, title_height);

    let body = TextStyle::new(ctx.config().body_font_size + 1.0);
    let mut offset = PADDING + title_height;
    for line in &lines {
        ctx.text(line, body, x, inner, align, offset, LINE_HEIGHT);
        offset += LINE_HEIGHT;
    }

    ctx.advance(box_height + SECTION_GAP)
}
