//! The per-vote table.
//!
//! Columns come from the writing system in physical left-to-right order, so
//! an RTL report draws Date at the left edge and Name at the right. Each cell
//! is shaped and aligned by its own script, not the report's language.

use crate::i18n::Labels;
use crate::layout::{Align, Color, Column, LayoutContext, TextStyle};
use crate::sanitize::CleanRecord;
use crate::text::Direction;

use super::{SECTION_GAP, heading, heading_height};

const HEADER_HEIGHT: f32 = 22.0;
const CELL_PADDING: f32 = 5.0;
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn table_width(columns: &[Column]) -> f32 {
    columns.iter().map(|c| c.width()).sum()
}

fn header_label<'a>(labels: &'a Labels, column: Column) -> &'a str {
    match column {
        Column::Name => labels.col_name,
        Column::Phone => labels.col_phone,
        Column::Answer => labels.col_answer,
        Column::Date => labels.col_date,
    }
}

/// Cell contents, identical in both languages.
pub fn cell_text(record: &CleanRecord, column: Column) -> String {
    match column {
        Column::Name => record.name.clone(),
        Column::Phone => record.phone.clone(),
        Column::Answer => record.answer.as_str().to_string(),
        Column::Date => record.created_at.format(DATE_FORMAT).to_string(),
    }
}

/// Draw one row of cells at the cursor. Does not advance.
fn draw_cells<'t>(
    ctx: &mut LayoutContext,
    columns: &[Column],
    style: TextStyle,
    height: f32,
    mut text_of: impl FnMut(Column) -> std::borrow::Cow<'t, str>,
) {
    let mut x = ctx.box_x(0.0, table_width(columns));
    for &column in columns {
        let text = text_of(column);
        let inner = column.width() - CELL_PADDING * 2.0;
        let align = Align::start_of(Direction::of(&text));
        ctx.text(&text, style, x + CELL_PADDING, inner, align, 0.0, height);
        x += column.width();
    }
}

fn header_row(ctx: &mut LayoutContext, labels: &Labels, columns: &[Column]) {
    let width = table_width(columns);
    ctx.fill_rect(ctx.box_x(0.0, width), 0.0, width, HEADER_HEIGHT, Color::TABLE_HEADER);
    let style = TextStyle::new(ctx.config().body_font_size + 1.0)
        .bold()
        .color(Color::WHITE);
    draw_cells(ctx, columns, style, HEADER_HEIGHT, |c| {
        header_label(labels, c).into()
    });
    ctx.advance(HEADER_HEIGHT);
}

pub fn render(ctx: &mut LayoutContext, labels: &Labels, records: &[CleanRecord]) -> f32 {
    let row_height = ctx.config().row_height;
    let cap = ctx.config().table_row_cap;
    let repeat_header = ctx.config().repeat_table_header;
    let columns = ctx.writing().column_order(&Column::ALL);
    let width = table_width(&columns);

    // keep the heading with the header row and at least one body row
    ctx.ensure_room(heading_height(ctx) + HEADER_HEIGHT + row_height);
    heading(ctx, labels.table_heading);
    header_row(ctx, labels, &columns);

    let body = TextStyle::new(ctx.config().body_font_size);
    if records.is_empty() {
        let muted = body.color(Color::TEXT_MUTED);
        let x = ctx.box_x(0.0, width);
        ctx.text(labels.no_votes, muted, x, width, Align::Center, 0.0, row_height);
        ctx.advance(row_height);
        return ctx.advance(SECTION_GAP);
    }
    if records.len() > cap {
        log::info!("Table limited to {cap} of {} records", records.len());
    }

    for (i, record) in records.iter().take(cap).enumerate() {
        if ctx.ensure_room(row_height) {
            log::debug!("Row {} starts page {}", i + 1, ctx.page_index() + 1);
            if repeat_header {
                header_row(ctx, labels, &columns);
            }
        }
        if i % 2 == 1 {
            ctx.fill_rect(ctx.box_x(0.0, width), 0.0, width, row_height, Color::ROW_STRIPE);
        }
        draw_cells(ctx, &columns, body, row_height, |c| cell_text(record, c).into());
        ctx.advance(row_height);
    }
    ctx.advance(SECTION_GAP)
}
